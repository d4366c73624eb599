//! Asynchronous image/sound loading and named lookup
//!
//! Loads are registered by short name and a host-relative path. Each one is
//! resolved exactly once off the tick loop and posted back through a channel;
//! `poll()` applies finished loads at the start of a tick. A failed load is
//! logged and stored as `Resource::Failed` - nothing here returns an error to
//! the game, callers simply get `None` when they look the name up.
//!
//! Sounds also carry their playback state (playing, looping, position,
//! volume). Mixing them to a device is the host's job.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::error::RuntimeError;

/// Where asset bytes come from
pub trait AssetSource: Send + Sync + 'static {
    fn read(&self, path: &str) -> Result<Vec<u8>, RuntimeError>;
}

/// Files under a root directory; leading `/` in asset paths is ignored
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, RuntimeError> {
        let full = self.root.join(path.trim_start_matches('/'));
        std::fs::read(&full).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                RuntimeError::AssetMissing(path.to_string())
            } else {
                RuntimeError::AssetIo {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }
}

/// In-memory assets keyed by path (tests, embedded builds)
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(path.to_string(), bytes);
        self
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, RuntimeError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| RuntimeError::AssetMissing(path.to_string()))
    }
}

/// Load state of one named resource
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Pending,
    Loaded(T),
    Failed,
}

impl<T> Resource<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Resource::Loaded(t) => Some(t),
            Resource::Pending | Resource::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Resource::Failed)
    }
}

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl ImageHandle {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    fn decode(path: &str, bytes: &[u8]) -> Result<Self, RuntimeError> {
        let img = image::load_from_memory(bytes)
            .map_err(|source| RuntimeError::ImageDecode {
                path: path.to_string(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(width, height, img.into_raw()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Encoded sound data plus playback state
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    data: Arc<[u8]>,
    pub playing: bool,
    pub looping: bool,
    /// Playback position in seconds, reset to 0 on stop
    pub position: f32,
    pub volume: f32,
}

impl Sound {
    fn new(data: Vec<u8>) -> Self {
        Self {
            data: data.into(),
            playing: false,
            looping: false,
            position: 0.0,
            volume: 1.0,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn stop(&mut self) {
        self.playing = false;
        self.looping = false;
        self.position = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    Image,
    Sound,
}

enum Payload {
    Image(ImageHandle),
    Sound(Vec<u8>),
}

struct Completion {
    kind: AssetKind,
    name: String,
    result: Result<Payload, RuntimeError>,
}

/// How registered loads are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// One worker thread per load
    Threaded,
    /// Read on the calling thread; still applied at the next `poll()`
    Inline,
}

pub struct ResourceTable {
    source: Arc<dyn AssetSource>,
    mode: LoadMode,
    images: HashMap<String, Resource<ImageHandle>>,
    sounds: HashMap<String, Resource<Sound>>,
    loops: HashSet<String>,
    total: usize,
    loaded: usize,
    failed: usize,
    master_volume: f32,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl std::fmt::Debug for ResourceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceTable")
            .field("mode", &self.mode)
            .field("images", &self.images.len())
            .field("sounds", &self.sounds.len())
            .field("total", &self.total)
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl ResourceTable {
    pub fn new(source: impl AssetSource) -> Self {
        Self::with_mode(source, LoadMode::Threaded)
    }

    pub fn with_mode(source: impl AssetSource, mode: LoadMode) -> Self {
        let (tx, rx) = channel();
        Self {
            source: Arc::new(source),
            mode,
            images: HashMap::new(),
            sounds: HashMap::new(),
            loops: HashSet::new(),
            total: 0,
            loaded: 0,
            failed: 0,
            master_volume: 1.0,
            tx,
            rx,
        }
    }

    // === Loading ===

    /// Register an image load; counted immediately, resolved later
    pub fn load_image(&mut self, name: &str, path: &str) {
        self.total += 1;
        self.images.insert(name.to_string(), Resource::Pending);
        let source = Arc::clone(&self.source);
        let (name, path) = (name.to_string(), path.to_string());
        self.dispatch(AssetKind::Image, name, path, move |path| {
            source
                .read(path)
                .and_then(|bytes| ImageHandle::decode(path, &bytes))
                .map(Payload::Image)
        });
    }

    /// Register a sound load; counted immediately, resolved later
    pub fn load_sound(&mut self, name: &str, path: &str) {
        self.total += 1;
        self.sounds.insert(name.to_string(), Resource::Pending);
        let source = Arc::clone(&self.source);
        let (name, path) = (name.to_string(), path.to_string());
        self.dispatch(AssetKind::Sound, name, path, move |path| {
            source.read(path).map(Payload::Sound)
        });
    }

    fn dispatch<F>(&self, kind: AssetKind, name: String, path: String, job: F)
    where
        F: FnOnce(&str) -> Result<Payload, RuntimeError> + Send + 'static,
    {
        let tx = self.tx.clone();
        match self.mode {
            LoadMode::Inline => {
                let result = job(&path);
                let _ = tx.send(Completion { kind, name, result });
            }
            LoadMode::Threaded => {
                let fallback = self.tx.clone();
                let thread_name = name.clone();
                let fallback_path = path.clone();
                let spawned = std::thread::Builder::new()
                    .name("asset-load".to_string())
                    .spawn(move || {
                        let result = job(&path);
                        let _ = tx.send(Completion {
                            kind,
                            name: thread_name,
                            result,
                        });
                    });
                if let Err(e) = spawned {
                    // Still resolve exactly once so progress can reach 1
                    let _ = fallback.send(Completion {
                        kind,
                        name,
                        result: Err(RuntimeError::AssetIo {
                            path: fallback_path,
                            source: e,
                        }),
                    });
                }
            }
        }
    }

    fn apply(&mut self, completion: Completion) {
        let Completion { kind, name, result } = completion;
        match result {
            Ok(Payload::Image(handle)) => {
                log::debug!("Image '{}' loaded ({}x{})", name, handle.width, handle.height);
                self.images.insert(name, Resource::Loaded(handle));
            }
            Ok(Payload::Sound(bytes)) => {
                log::debug!("Sound '{}' loaded ({} bytes)", name, bytes.len());
                self.sounds.insert(name, Resource::Loaded(Sound::new(bytes)));
            }
            Err(e) => {
                log::warn!("{:?} '{}' failed to load: {}", kind, name, e);
                self.failed += 1;
                match kind {
                    AssetKind::Image => {
                        self.images.insert(name, Resource::Failed);
                    }
                    AssetKind::Sound => {
                        self.sounds.insert(name, Resource::Failed);
                    }
                }
            }
        }
        self.loaded += 1;
        if self.loaded == self.total {
            log::info!(
                "All {} resources resolved ({} failed)",
                self.total,
                self.failed
            );
        }
    }

    /// Apply every load that has finished since the last call
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Block until every registered load has resolved
    ///
    /// A load that never resolves blocks forever; there is no timeout.
    pub fn wait_all(&mut self) {
        while self.loaded < self.total {
            match self.rx.recv() {
                Ok(completion) => self.apply(completion),
                Err(_) => break,
            }
        }
    }

    /// Fraction of registered loads that have resolved; 1 when nothing is registered
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.loaded as f32 / self.total as f32
        }
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    // === Lookup ===

    pub fn image(&self, name: &str) -> Option<&ImageHandle> {
        self.images.get(name).and_then(Resource::loaded)
    }

    pub fn image_state(&self, name: &str) -> Option<&Resource<ImageHandle>> {
        self.images.get(name)
    }

    pub fn sound(&self, name: &str) -> Option<&Sound> {
        self.sounds.get(name).and_then(Resource::loaded)
    }

    pub fn sound_state(&self, name: &str) -> Option<&Resource<Sound>> {
        self.sounds.get(name)
    }

    fn sound_mut(&mut self, name: &str) -> Option<&mut Sound> {
        match self.sounds.get_mut(name) {
            Some(Resource::Loaded(s)) => Some(s),
            _ => None,
        }
    }

    // === Playback ===

    /// Play once from the start; returns false if the sound is unavailable
    pub fn play_sound(&mut self, name: &str) -> bool {
        let Some(sound) = self.sound_mut(name) else {
            return false;
        };
        sound.position = 0.0;
        sound.playing = true;
        sound.looping = false;
        self.loops.remove(name);
        true
    }

    /// Start looping; already-looping sounds are left untouched
    pub fn play_sound_loop(&mut self, name: &str) -> bool {
        let Some(sound) = self.sound_mut(name) else {
            return false;
        };
        if !(sound.playing && sound.looping) {
            sound.position = 0.0;
            sound.playing = true;
            sound.looping = true;
        }
        self.loops.insert(name.to_string());
        true
    }

    /// Stop and rewind; clears loop membership
    pub fn stop_sound(&mut self, name: &str) {
        if let Some(sound) = self.sound_mut(name) {
            sound.stop();
        }
        self.loops.remove(name);
    }

    /// Per-sound volume, clamped to 0..1
    pub fn set_volume(&mut self, name: &str, volume: f32) {
        if let Some(sound) = self.sound_mut(name) {
            sound.volume = volume.clamp(0.0, 1.0);
        }
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// Volume the host should mix a sound at
    pub fn effective_volume(&self, name: &str) -> f32 {
        self.sound(name)
            .map(|s| s.volume * self.master_volume)
            .unwrap_or(0.0)
    }

    /// Stop every looping sound; touches only the active loops
    pub fn stop_all_loops(&mut self) {
        let loops: Vec<String> = self.loops.drain().collect();
        for name in loops {
            if let Some(sound) = self.sound_mut(&name) {
                sound.stop();
            }
        }
    }

    pub fn active_loops(&self) -> usize {
        self.loops.len()
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.sound(name).is_some_and(|s| s.playing)
    }
}
