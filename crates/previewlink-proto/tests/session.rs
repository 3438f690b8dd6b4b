//! End-to-end exchanges between a build-tool side and a preview-host side
//! over a real socket pair.

use std::os::unix::net::UnixStream;
use std::thread;

use previewlink_proto::{
    receive_attach, receive_config_from_gradle, receive_frame, receive_preview_request,
    send_attach, send_config_from_gradle, send_frame, send_preview_request, Command, CommandKind,
    FrameConfig, FrameRequest, PreviewHostConfig, RemoteConnection, RenderedFrame,
    StreamConnection,
};
use previewlink_wire::{PacketKind, PacketWriter};

type Conn = StreamConnection<UnixStream, UnixStream>;

fn connection_pair() -> (Conn, Conn) {
    let (a, b) = UnixStream::pair().unwrap();
    let left = StreamConnection::new(a.try_clone().unwrap(), a);
    let right = StreamConnection::new(b.try_clone().unwrap(), b);
    (left, right)
}

#[test]
fn full_session() {
    let (mut gradle, mut host) = connection_pair();

    let host_thread = thread::spawn(move || {
        // The host announces readiness, learns its configuration, then
        // serves one render request.
        send_attach(&mut host).unwrap();

        let mut classpath = None;
        let mut fq_name = None;
        let mut config = None;
        for _ in 0..3 {
            receive_config_from_gradle(
                &mut host,
                |value| classpath = Some(value),
                |value| fq_name = Some(value),
                |value| config = Some(value),
            )
            .unwrap();
        }
        assert_eq!(classpath.as_deref(), Some("preview.jar"));
        assert_eq!(fq_name.as_deref(), Some("com.example.AppPreview"));
        assert_eq!(
            config,
            Some(PreviewHostConfig {
                java_executable: "/opt my jdk/bin/java".to_string(),
                host_classpath: "host.jar:runtime.jar".to_string(),
            })
        );

        let mut request = None;
        for _ in 0..2 {
            receive_preview_request(&mut host, |_| {}, |value| request = Some(value)).unwrap();
        }
        let request = request.expect("render request must arrive");
        assert_eq!(request.fq_name, "com.example.AppPreview");
        assert_eq!(request.config.scale.map(f64::to_bits), Some(2.0f64.to_bits()));

        // Pretend to render: one byte per pixel.
        let pixels = vec![0x2A; (request.config.width * request.config.height) as usize];
        let frame = RenderedFrame::new(pixels, request.config.width, request.config.height);
        send_frame(&mut host, &frame).unwrap();
    });

    let mut attached = false;
    receive_attach(&mut gradle, || attached = true).unwrap();
    assert!(attached);

    let host_config = PreviewHostConfig {
        java_executable: "/opt my jdk/bin/java".to_string(),
        host_classpath: "host.jar:runtime.jar".to_string(),
    };
    send_config_from_gradle(
        &mut gradle,
        &host_config,
        "preview.jar",
        "com.example.AppPreview",
    )
    .unwrap();

    let request = FrameRequest {
        fq_name: "com.example.AppPreview".to_string(),
        config: FrameConfig {
            width: 40,
            height: 80,
            scale: Some(2.0),
        },
    };
    send_preview_request(&mut gradle, "preview.jar", &request).unwrap();

    let mut frame = None;
    receive_frame(&mut gradle, |value| frame = Some(value)).unwrap();

    host_thread.join().unwrap();

    let frame = frame.expect("frame must arrive");
    assert_eq!(frame.width, 40);
    assert_eq!(frame.height, 80);
    assert_eq!(frame.bytes.len(), 40 * 80);
    assert!(frame.bytes.iter().all(|byte| *byte == 0x2A));
}

#[test]
fn frame_roundtrip_with_arbitrary_bytes() {
    let (mut sender, mut receiver) = connection_pair();

    let bytes: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
    let sent = RenderedFrame::new(bytes, 1920, 1080);
    send_frame(&mut sender, &sent).unwrap();

    let mut received = None;
    receive_frame(&mut receiver, |frame| received = Some(frame)).unwrap();
    assert_eq!(received, Some(sent));
}

#[test]
fn unknown_command_tags_are_ignored_by_every_receiver() {
    // A tag from a hypothetical newer protocol version.
    let newer = Command::with_tag("SHUTDOWN", ["now".to_string()]);

    let receivers: &[fn(&mut Conn)] = &[
        |conn| receive_attach(conn, || panic!("attach must not fire")).unwrap(),
        |conn| receive_frame(conn, |_| panic!("frame must not fire")).unwrap(),
        |conn| {
            receive_config_from_gradle(
                conn,
                |_| panic!("classpath must not fire"),
                |_| panic!("fq name must not fire"),
                |_| panic!("host config must not fire"),
            )
            .unwrap()
        },
        |conn| {
            receive_preview_request(
                conn,
                |_| panic!("classpath must not fire"),
                |_| panic!("request must not fire"),
            )
            .unwrap()
        },
    ];

    for receive in receivers {
        let (a, b) = UnixStream::pair().unwrap();
        let mut raw = PacketWriter::new(a);
        raw.send(PacketKind::Command, &newer.encode()).unwrap();

        let mut conn = StreamConnection::new(b.try_clone().unwrap(), b);
        receive(&mut conn);
    }
}

#[test]
fn interleaved_requests_and_frames() {
    let (mut gradle, mut host) = connection_pair();

    let host_thread = thread::spawn(move || {
        for _ in 0..8 {
            let mut request = None;
            for _ in 0..2 {
                receive_preview_request(&mut host, |_| {}, |value| request = Some(value)).unwrap();
            }
            let request = request.unwrap();
            let frame = RenderedFrame::new(
                vec![1u8; request.config.width as usize],
                request.config.width,
                request.config.height,
            );
            send_frame(&mut host, &frame).unwrap();
        }
    });

    for i in 1..=8u32 {
        let request = FrameRequest {
            fq_name: format!("pkg.Preview{i}"),
            config: FrameConfig {
                width: i * 10,
                height: i * 20,
                scale: None,
            },
        };
        send_preview_request(&mut gradle, "cp.jar", &request).unwrap();

        let mut frame = None;
        receive_frame(&mut gradle, |value| frame = Some(value)).unwrap();
        let frame = frame.unwrap();
        assert_eq!(frame.width, i * 10);
        assert_eq!(frame.height, i * 20);
        assert_eq!(frame.bytes.len(), (i * 10) as usize);
    }

    host_thread.join().unwrap();
}

#[test]
fn bootstrap_callbacks_fire_exactly_once() {
    let (mut gradle, mut host) = connection_pair();

    let config = PreviewHostConfig {
        java_executable: "/opt/jdk/bin/java".to_string(),
        host_classpath: "a.jar:b.jar".to_string(),
    };
    send_config_from_gradle(&mut gradle, &config, "c.jar", "pkg.Foo").unwrap();

    let mut classpath_calls = 0;
    let mut fq_name_calls = 0;
    let mut config_calls = 0;
    for _ in 0..3 {
        receive_config_from_gradle(
            &mut host,
            |value| {
                classpath_calls += 1;
                assert_eq!(value, "c.jar");
            },
            |value| {
                fq_name_calls += 1;
                assert_eq!(value, "pkg.Foo");
            },
            |value| {
                config_calls += 1;
                assert_eq!(value.java_executable, "/opt/jdk/bin/java");
                assert_eq!(value.host_classpath, "a.jar:b.jar");
            },
        )
        .unwrap();
    }

    assert_eq!(
        (classpath_calls, fq_name_calls, config_calls),
        (1, 1, 1),
        "each bootstrap callback fires exactly once"
    );
}

#[test]
fn raw_primitives_match_flow_output() {
    // What send_frame puts on the wire, observed through the primitives.
    let (mut sender, mut receiver) = connection_pair();

    let frame = RenderedFrame::new(vec![9u8, 9, 9], 3, 1);
    send_frame(&mut sender, &frame).unwrap();

    let command = receiver.receive_command().unwrap();
    assert_eq!(command.kind(), Some(CommandKind::Frame));
    assert_eq!(command.args(), ["3", "1"]);

    let data = receiver.receive_data().unwrap();
    assert_eq!(data.as_ref(), &[9, 9, 9]);
}
