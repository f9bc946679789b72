/// Plays background music for a scene. Mixing and streaming live behind
/// this trait.
pub trait AudioBackend {
    fn play(&mut self, url: &str);

    /// Url of the track started last, if the backend remembers one.
    fn now_playing(&self) -> Option<&str> {
        None
    }
}

/// Backend without an output device: records the request and logs it.
#[derive(Debug, Default)]
pub struct LogAudio {
    current: Option<String>,
}

impl AudioBackend for LogAudio {
    fn play(&mut self, url: &str) {
        log::info!("audio: playing {url}");
        self.current = Some(url.to_owned());
    }

    fn now_playing(&self) -> Option<&str> {
        self.current.as_deref()
    }
}
