//! # Example: payload
//!
//! Shows how to attach data to an event and read it back on the receiving side.
//!
//! - On the default dispatcher payloads are type-erased ([`tagbus::Payload`]);
//!   use `Event::with_any` and `downcast_ref`.
//! - On an explicit `Dispatcher<T>` the payload is simply `T`.
//!
//! ## Run
//! ```bash
//! cargo run --example payload
//! ```

use tagbus::{Dispatcher, DispatcherConfig, Event};

#[derive(Clone, Debug)]
struct Upload {
    file: String,
    bytes: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Default dispatcher: mixed payload kinds.
    let mut chn = tagbus::listen("example.").await;
    tokio::spawn(async {
        tagbus::announce(Event::with_any("example.hello", String::from("world"))).await;
        tagbus::announce(Event::with_any("example.answer", 42i64)).await;
    });

    for _ in 0..2 {
        let Some(e) = chn.recv().await else { break };
        if let Some(s) = e.downcast_ref::<String>() {
            println!("{} {s}", e.tag());
        } else if let Some(n) = e.downcast_ref::<i64>() {
            println!("{} {n}", e.tag());
        }
    }

    // Explicit dispatcher: statically typed payload.
    let uploads: Dispatcher<Upload> = Dispatcher::new(DispatcherConfig::default());
    let mut done = uploads.subscribe("upload.done").await;
    uploads
        .announce(Event::new(
            "upload.done",
            Upload {
                file: "report.pdf".into(),
                bytes: 48_213,
            },
        ))
        .await;

    if let Some(e) = done.recv().await {
        println!("{e}");
        if let Some(u) = e.data() {
            println!("{} bytes of {}", u.bytes, u.file);
        }
    }
    Ok(())
}
