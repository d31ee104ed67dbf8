use once_cell::sync::Lazy;
use tokio::sync::oneshot;

pub static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

pub fn spawn_async<F>(fut: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    RUNTIME.spawn(fut);
}

/// Run `fut` on the worker runtime. The receiver can be awaited from the GTK
/// main context.
pub fn run_async_to_main<T, Fut>(fut: Fut) -> oneshot::Receiver<T>
where
    T: Send + 'static,
    Fut: std::future::Future<Output = T> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    spawn_async(async move {
        let _ = tx.send(fut.await);
    });
    rx
}
