//! End-to-end initialisation over a scripted transport.

use std::time::Duration;

use dra818_at::{Configuration, HandshakeState, SessionBuilder};
use dra818_core::{Error, FilterSetting, FrequencyValue, GroupSetting};
use dra818_test_harness::MockTransport;

fn freq(hundreds_hz: u32) -> FrequencyValue {
    FrequencyValue::new(hundreds_hz).unwrap()
}

#[tokio::test(start_paused = true)]
async fn full_init_with_late_handshake() {
    let mut mock = MockTransport::new();
    mock.expect_silence(b"AT+DMOCONNECT\r\n");
    mock.expect_fragments(b"AT+DMOCONNECT\r\n", &[b"+DMO", b"CONNECT", b":0\r\n"]);
    mock.expect(
        b"AT+DMOSETGROUP=0,145.5000,144.8000,0000,2,0000\r\n",
        b"+DMOSETGROUP:0\r\n",
    );
    mock.expect(b"AT+SETFILTER=1,1,1\r\n", b"+DMOSETFILTER:0\r\n");
    mock.expect(b"AT+DMOSETVOLUME=6\r\n", b"+DMOSETVOLUME:0\r\n");

    let mut session = SessionBuilder::new()
        .verbose(true)
        .build_with_transport(Box::new(mock))
        .unwrap();

    let configuration = Configuration {
        group: GroupSetting::new(freq(1455000), freq(1448000))
            .with_squelch(2)
            .unwrap(),
        filter: FilterSetting::default(),
        volume: 6,
    };

    let exchanges = session.initialize(&configuration).await.unwrap();
    assert_eq!(session.state(), HandshakeState::Connected);
    assert_eq!(session.probes_sent(), 2);

    let responses: Vec<String> = exchanges.iter().map(|e| e.response_text()).collect();
    assert_eq!(
        responses,
        [
            "+DMOCONNECT:0",
            "+DMOSETGROUP:0",
            "+DMOSETFILTER:0",
            "+DMOSETVOLUME:0",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn silent_module_sends_nothing_after_handshake() {
    let mut mock = MockTransport::new();
    for _ in 0..3 {
        mock.expect_silence(b"AT+DMOCONNECT\r\n");
    }

    let mut session = SessionBuilder::new()
        .response_timeout(Duration::from_secs(1))
        .build_with_transport(Box::new(mock))
        .unwrap();

    let start = tokio::time::Instant::now();
    let result = session.initialize(&Configuration::default()).await;
    assert!(matches!(result, Err(Error::HandshakeFailed { attempts: 3 })));
    assert_eq!(session.state(), HandshakeState::Failed);
    assert!(start.elapsed() >= Duration::from_secs(3));
}

#[tokio::test]
async fn scan_loop_over_one_session() {
    let mut mock = MockTransport::new();
    mock.expect(b"S+145.5000\r\n", b"S=1\r\n");
    mock.expect(b"S+145.5000\r\n", b"S=0\r\n");

    let mut session = SessionBuilder::new()
        .build_with_transport(Box::new(mock))
        .unwrap();

    let f = freq(1455000);
    let first = session.scan(f).await.unwrap();
    let second = session.scan(f).await.unwrap();
    assert_eq!(first, Some(dra818_at::ScanResult::Clear));
    assert_eq!(second, Some(dra818_at::ScanResult::Busy));
}
