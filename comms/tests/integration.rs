use std::borrow::Cow;

use comms::{
    Deserialize, Serialize,
    msg::{Command, Msg, Payload},
};
use tokio::io;

struct MyStr<'a>(&'a str);

impl<'a> Serialize<'a> for MyStr<'_> {
    fn serialize(&'a self, _buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        Some(self.0.as_bytes())
    }
}

impl<'a> Deserialize<'a> for MyStr<'a> {
    fn deserialize(buf: &'a [u8]) -> std::io::Result<Self> {
        Ok(Self(std::str::from_utf8(buf).unwrap()))
    }
}

#[test]
fn serialize_deserialize() {
    let s = MyStr("Hello, world!");
    let serialized = s.serialize(&mut Vec::new()).unwrap();
    let deserialized = MyStr::deserialize(serialized).unwrap();
    assert_eq!(deserialized.0, s.0);
}

#[tokio::test]
async fn send_recv() {
    const SIZE: usize = 128;

    let msg = MyStr("Hello, world!");

    let (one, two) = io::duplex(SIZE);
    let (rx, tx) = io::split(one);
    let (_, mut tx) = comms::channel(rx, tx);

    tx.send(&msg).await.unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let s: MyStr = rx.recv().await.unwrap();

    assert_eq!(msg.0, s.0);
}

#[tokio::test]
async fn send_recv_message_sequence() {
    const SIZE: usize = 1024;

    let (one, two) = io::duplex(SIZE);
    let (rx, tx) = io::split(one);
    let (_, mut tx) = comms::channel(rx, tx);

    let (rx, tx2) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx2);

    let encoded = [1u8, 2, 3, 4, 5];
    let updates = Msg::Data(Payload::Updates {
        originator: 11,
        task: 2,
        encoded: &encoded,
    });
    let finished = Msg::Control(Command::JobFinished {
        originator: 11,
        task: 2,
    });
    let err = Msg::Err(Cow::Borrowed("stalled"));

    tx.send(&updates).await.unwrap();
    tx.send(&finished).await.unwrap();
    tx.send(&err).await.unwrap();

    for expected in [updates, finished, err] {
        let msg: Msg = rx.recv().await.unwrap();
        assert_eq!(msg, expected);
    }
}

#[tokio::test]
async fn recv_rejects_corrupt_length_prefix() {
    use tokio::io::AsyncWriteExt;

    let (mut raw, two) = io::duplex(64);
    raw.write_all(&u64::MAX.to_be_bytes()).await.unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let err = rx.recv::<Msg>().await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[tokio::test]
async fn frame_limit_applies_to_both_ends() {
    const LIMIT: usize = 32;

    let (one, two) = io::duplex(1024);
    let (rx, tx) = io::split(one);
    let (_, tx) = comms::channel(rx, tx);
    let mut tx = tx.with_max_frame_len(LIMIT);

    let (rx, tx2) = io::split(two);
    let (rx, _) = comms::channel(rx, tx2);
    let mut rx = rx.with_max_frame_len(LIMIT);

    let big = [0u8; LIMIT];
    let msg = Msg::Data(Payload::Updates {
        originator: 1,
        task: 1,
        encoded: &big,
    });
    let err = tx.send(&msg).await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

    let small = [7u8; 4];
    let msg = Msg::Data(Payload::Updates {
        originator: 1,
        task: 1,
        encoded: &small,
    });
    tx.send(&msg).await.unwrap();

    let got: Msg = rx.recv().await.unwrap();
    assert_eq!(got, msg);
}
