// crates/osc-client/tests/udp_send.rs
use std::time::Duration;

use osc_client::{Client, ClientError, QueuedClient};
use osc_core::{Arg, Bundle, Message, OscValue, TimeTag};
use osc_protocol::{decode_bundle, decode_message, MAX_DATAGRAM_SIZE};
use tokio::net::UdpSocket;
use tokio::time::timeout;

async fn receiver() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0").await.unwrap()
}

async fn recv(socket: &UdpSocket) -> Vec<u8> {
    let mut buf = vec![0u8; 2048];
    let n = timeout(Duration::from_secs(2), socket.recv(&mut buf))
        .await
        .expect("no datagram within 2s")
        .unwrap();
    buf.truncate(n);
    buf
}

#[tokio::test]
async fn sends_messages_as_single_datagrams() {
    let rx = receiver().await;
    let client = Client::connect(rx.local_addr().unwrap()).await.unwrap();

    client
        .send_args("/i", vec![Arg::infer(42)])
        .await
        .unwrap();
    assert_eq!(recv(&rx).await, b"/i\0\0,i\0\0\0\0\0*");

    let msg = Message::new("/mixer/fader1").with_arg(0.75f32);
    client.send_message(&msg).await.unwrap();
    assert_eq!(decode_message(&recv(&rx).await).unwrap(), msg);
}

#[tokio::test]
async fn sends_bundles() {
    let rx = receiver().await;
    let client = Client::connect(rx.local_addr().unwrap()).await.unwrap();

    let bundle = Bundle::new(TimeTag::new(3_657_147_741, 0))
        .with(Message::new("/a").with_arg(1))
        .with(Message::new("/b").with_arg("two"));
    client.send_bundle(&bundle).await.unwrap();

    let data = recv(&rx).await;
    let messages: Vec<(TimeTag, Message)> = decode_bundle(&data)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].1.args, vec![OscValue::String("two".to_string())]);
    assert_eq!(messages[0].0, bundle.timetag);
}

#[tokio::test]
async fn refuses_oversized_packets() {
    let rx = receiver().await;
    let client = Client::connect(rx.local_addr().unwrap()).await.unwrap();

    let blob = vec![0u8; MAX_DATAGRAM_SIZE];
    match client.send_args("/big", vec![Arg::infer(blob)]).await {
        Err(ClientError::TooLarge { size, max }) => {
            assert!(size > max);
            assert_eq!(max, MAX_DATAGRAM_SIZE);
        }
        other => panic!("expected TooLarge, got {:?}", other),
    }
}

#[tokio::test]
async fn encode_errors_surface_to_the_caller() {
    let rx = receiver().await;
    let client = Client::connect(rx.local_addr().unwrap()).await.unwrap();

    assert!(matches!(
        client.send_args("no-slash", vec![]).await,
        Err(ClientError::Protocol(_))
    ));
    assert!(matches!(
        client.send_args("/s", vec![Arg::infer("müsic")]).await,
        Err(ClientError::Protocol(_))
    ));
}

#[tokio::test]
async fn queued_client_delivers_everything_before_close_returns() {
    let rx = receiver().await;
    let queued = QueuedClient::start(rx.local_addr().unwrap()).await.unwrap();

    for i in 0..5 {
        queued.send("/count", vec![Arg::infer(i)]).await.unwrap();
    }
    queued.close().await.unwrap();

    for i in 0..5 {
        let msg = decode_message(&recv(&rx).await).unwrap();
        assert_eq!(msg.address, "/count");
        assert_eq!(msg.args, vec![OscValue::Int(i)]);
    }
}

#[tokio::test]
async fn queued_client_logs_bad_packets_and_keeps_going() {
    let rx = receiver().await;
    let queued = QueuedClient::start(rx.local_addr().unwrap()).await.unwrap();

    queued.send("bad", vec![]).await.unwrap();
    queued.send("/good", vec![]).await.unwrap();
    queued.close().await.unwrap();

    assert_eq!(decode_message(&recv(&rx).await).unwrap().address, "/good");
}

#[tokio::test]
async fn idle_queued_client_closes_without_waiting_for_the_timeout() {
    let rx = receiver().await;
    let queued = QueuedClient::start_with_timeout(rx.local_addr().unwrap(), Duration::from_secs(5))
        .await
        .unwrap();

    let started = std::time::Instant::now();
    queued.close().await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn queued_close_gives_up_after_its_timeout() {
    let rx = receiver().await;
    let queued = QueuedClient::start_with_timeout(rx.local_addr().unwrap(), Duration::ZERO)
        .await
        .unwrap();

    for i in 0..200 {
        queued.send("/count", vec![Arg::infer(i)]).await.unwrap();
    }

    // Either the task got everything out in time or it was cut short;
    // close never waits past the timeout.
    let closed = timeout(Duration::from_secs(1), queued.close())
        .await
        .expect("close outlived its timeout");
    assert!(matches!(closed, Ok(()) | Err(ClientError::Timeout)), "{:?}", closed);

    let mut buf = vec![0u8; 2048];
    let mut delivered = 0;
    while let Ok(Ok(n)) = timeout(Duration::from_millis(200), rx.recv(&mut buf)).await {
        assert_eq!(decode_message(&buf[..n]).unwrap().address, "/count");
        delivered += 1;
    }
    assert!(delivered <= 200);
}
