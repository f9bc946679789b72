use std::{future::Future, sync::Arc};

use tokio::{
    runtime::Handle as TokioHandle,
    sync::mpsc::{UnboundedReceiver, UnboundedSender, error::TryRecvError, unbounded_channel},
};
use uuid::Uuid;

use crate::{
    error::AssetError, font::Font, loader::ResourceLoader, model::ModelData, texture::TextureData,
};

/// Identifies one load request; echoed back in its completion message.
pub type RequestId = Uuid;

// Completion of one request. Every request yields exactly one message.
#[derive(Debug)]
pub enum AssetWorkerMessage {
    ImageLoaded {
        id: RequestId,
        url: String,
        result: Result<TextureData, AssetError>,
    },
    ModelLoaded {
        id: RequestId,
        url: String,
        result: Result<ModelData, AssetError>,
    },
    FontLoaded {
        id: RequestId,
        name: String,
        result: Result<Font, AssetError>,
    },
    ScriptLoaded {
        id: RequestId,
        url: String,
        result: Result<String, AssetError>,
    },
    DocumentLoaded {
        id: RequestId,
        url: String,
        result: Result<String, AssetError>,
    },
}

impl AssetWorkerMessage {
    pub fn id(&self) -> RequestId {
        match self {
            AssetWorkerMessage::ImageLoaded { id, .. }
            | AssetWorkerMessage::ModelLoaded { id, .. }
            | AssetWorkerMessage::FontLoaded { id, .. }
            | AssetWorkerMessage::ScriptLoaded { id, .. }
            | AssetWorkerMessage::DocumentLoaded { id, .. } => *id,
        }
    }
}

/// Issues loads on the IO runtime and returns immediately. Results come
/// back through the paired [`AssetReceiver`].
#[derive(Clone)]
pub struct AssetServer {
    loader: Arc<dyn ResourceLoader>,
    event_sender: UnboundedSender<AssetWorkerMessage>,
    // The "Ticket" to the Async World
    io_handle: TokioHandle,
}

impl AssetServer {
    pub fn new(loader: Arc<dyn ResourceLoader>, io_handle: TokioHandle) -> (Self, AssetReceiver) {
        let (event_sender, receiver) = unbounded_channel();
        let server = Self {
            loader,
            event_sender,
            io_handle,
        };
        (server, AssetReceiver(receiver))
    }

    pub fn load_image(&self, url: &str) -> RequestId {
        let url = url.to_owned();
        self.spawn_request(move |loader, id| async move {
            log::debug!("[AssetServer] Loading image: {}", url);
            let result = loader.load_image(&url).await;
            AssetWorkerMessage::ImageLoaded { id, url, result }
        })
    }

    pub fn load_model(&self, url: &str) -> RequestId {
        let url = url.to_owned();
        self.spawn_request(move |loader, id| async move {
            log::debug!("[AssetServer] Loading model: {}", url);
            let result = loader.load_model(&url).await;
            AssetWorkerMessage::ModelLoaded { id, url, result }
        })
    }

    pub fn load_font(&self, name: &str) -> RequestId {
        let name = name.to_owned();
        self.spawn_request(move |loader, id| async move {
            log::debug!("[AssetServer] Loading font: {}", name);
            let result = loader.load_font(&name).await;
            AssetWorkerMessage::FontLoaded { id, name, result }
        })
    }

    pub fn load_script(&self, url: &str) -> RequestId {
        let url = url.to_owned();
        self.spawn_request(move |loader, id| async move {
            log::debug!("[AssetServer] Loading script: {}", url);
            let result = loader.load_text(&url).await;
            AssetWorkerMessage::ScriptLoaded { id, url, result }
        })
    }

    pub fn load_document(&self, url: &str) -> RequestId {
        let url = url.to_owned();
        self.spawn_request(move |loader, id| async move {
            log::debug!("[AssetServer] Loading document: {}", url);
            let result = loader.load_text(&url).await;
            AssetWorkerMessage::DocumentLoaded { id, url, result }
        })
    }

    fn spawn_request<F, Fut>(&self, task: F) -> RequestId
    where
        F: FnOnce(Arc<dyn ResourceLoader>, RequestId) -> Fut,
        Fut: Future<Output = AssetWorkerMessage> + Send + 'static,
    {
        let id = RequestId::new_v4();
        let work = task(Arc::clone(&self.loader), id);
        let sender = self.event_sender.clone();

        // Works from any thread; the task runs on the IO pool.
        self.io_handle.spawn(async move {
            // A closed channel means the engine is gone; nobody to notify.
            let _ = sender.send(work.await);
        });

        id
    }
}

// Internal wrapper to hold the receiver
pub struct AssetReceiver(UnboundedReceiver<AssetWorkerMessage>);

impl AssetReceiver {
    /// Next finished load, without waiting.
    pub fn try_recv(&mut self) -> Option<AssetWorkerMessage> {
        match self.0.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocks the calling thread until a load finishes. Must not be called
    /// from inside the async runtime.
    pub fn blocking_recv(&mut self) -> Option<AssetWorkerMessage> {
        self.0.blocking_recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn every_request_yields_one_message() {
        let rt = runtime();
        let loader = MemoryLoader::new().with("a.js", "fn a() {}");
        let (server, mut receiver) = AssetServer::new(Arc::new(loader), rt.handle().clone());

        let ok = server.load_script("a.js");
        let missing = server.load_image("missing.png");

        let mut seen = Vec::new();
        for _ in 0..2 {
            let msg = receiver.blocking_recv().unwrap();
            match &msg {
                AssetWorkerMessage::ScriptLoaded { result, .. } => {
                    assert_eq!(result.as_deref().unwrap(), "fn a() {}")
                }
                AssetWorkerMessage::ImageLoaded { result, .. } => {
                    assert!(matches!(result, Err(AssetError::NotFound { .. })))
                }
                other => panic!("unexpected message {other:?}"),
            }
            seen.push(msg.id());
        }

        seen.sort();
        let mut expected = vec![ok, missing];
        expected.sort();
        assert_eq!(seen, expected);
        assert!(receiver.try_recv().is_none());
    }
}
