use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

/// Upgrade to a websocket that streams appointment events.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(events): State<broadcast::Sender<String>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, events.subscribe()))
}

async fn handle_socket(socket: WebSocket, rx: broadcast::Receiver<String>) {
    let (sender, receiver) = socket.split();
    tracing::debug!("Websocket subscriber connected");
    forward_events(sender, receiver, rx).await;
    tracing::debug!("Websocket subscriber disconnected");
}

/// Pushes events to `sender` until the client closes `receiver` or the feed
/// ends. Whichever side finishes first cancels the other.
async fn forward_events<Tx, Rx, E>(
    mut sender: Tx,
    mut receiver: Rx,
    mut rx: broadcast::Receiver<String>,
) where
    Tx: Sink<Message> + Unpin + Send + 'static,
    Rx: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
    E: Send + 'static,
{
    // The feed is one-way; inbound frames only tell us when the client leaves
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if sender.send(Message::Text(event.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Websocket subscriber lagged behind the event feed");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{sink, stream};
    use std::convert::Infallible;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    type Inbound = Result<Message, Infallible>;

    #[tokio::test]
    async fn client_close_releases_the_event_subscription() {
        let (events, _) = broadcast::channel::<String>(8);
        let inbound = stream::iter(vec![Inbound::Ok(Message::Close(None))]);

        timeout(
            Duration::from_secs(1),
            forward_events(sink::drain::<Message>(), inbound, events.subscribe()),
        )
        .await
        .unwrap();

        // The aborted send task drops its receiver once the runtime reaps it
        timeout(Duration::from_secs(1), async {
            while events.receiver_count() > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn events_are_sent_until_the_feed_closes() {
        let (events, rx) = broadcast::channel::<String>(8);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let outbound = Box::pin(sink::unfold(out_tx, |out_tx, msg: Message| async move {
            let _ = out_tx.send(msg);
            Ok::<_, Infallible>(out_tx)
        }));

        events.send("first".to_string()).unwrap();
        events.send("second".to_string()).unwrap();
        drop(events);

        timeout(
            Duration::from_secs(1),
            forward_events(outbound, stream::pending::<Inbound>(), rx),
        )
        .await
        .unwrap();

        assert_eq!(out_rx.recv().await, Some(Message::Text("first".into())));
        assert_eq!(out_rx.recv().await, Some(Message::Text("second".into())));
        assert_eq!(out_rx.recv().await, None);
    }
}
