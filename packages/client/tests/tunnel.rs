mod common;

use std::io::{Read, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{BlockingUpstream, MockProxy, RecordingUpstream, spawn_destination};
use tunnelchain_client::{
    BasicAuth, Connection, HttpProxyClient, Kind, ProxyClient, ProxyConfig,
};

fn http_client(proxy: &MockProxy, upstream: Option<Arc<dyn ProxyClient>>) -> HttpProxyClient {
    HttpProxyClient::new("http", &proxy.address(), "", false, upstream).expect("client")
}

#[test]
fn first_read_returns_bytes_sent_after_the_response() {
    let proxy = MockProxy::spawn(b"HTTP/1.1 200 OK\r\n\r\nPAYLOAD");
    let client = http_client(&proxy, None);

    let mut conn = client.dial("tcp", "destination.test:443").expect("dial");
    let mut buf = [0u8; 64];
    let n = conn.read(&mut buf).expect("read");
    assert_eq!(&buf[..n], b"PAYLOAD");

    conn.write_all(b"ping").expect("write");
    let mut echoed = [0u8; 4];
    conn.read_exact(&mut echoed).expect("echo");
    assert_eq!(&echoed, b"ping");

    conn.close().expect("close");
    let head = proxy.join();
    assert!(head.starts_with("CONNECT destination.test:443 HTTP/1.1\r\n"));
    assert!(head.contains(&format!("host: {}\r\n", client.address())));
}

#[test]
fn basic_auth_is_sent_on_connect() {
    let proxy = MockProxy::spawn(b"HTTP/1.1 200 OK\r\n\r\n");
    let mut config = ProxyConfig::new("http", proxy.address());
    config.basic_auth = Some(BasicAuth::new("alice", "s3cret"));
    let client = HttpProxyClient::from_config(&config, None).expect("client");

    let mut conn = client.dial("tcp", "destination.test:80").expect("dial");
    conn.close().expect("close");

    let head = proxy.join();
    assert!(head.contains("proxy-authorization: Basic YWxpY2U6czNjcmV0\r\n"));
}

#[test]
fn rejected_tunnel_closes_the_proxy_connection() {
    const REPLY: &[u8] = b"HTTP/1.1 407 Proxy Authentication Required\r\nContent-Length: 0\r\n\r\n";
    let proxy = MockProxy::spawn(REPLY);
    let upstream = Arc::new(RecordingUpstream::default());
    let client = http_client(&proxy, Some(upstream.clone()));

    let err = client.dial("tcp", "destination.test:443").unwrap_err();
    assert!(matches!(err.kind(), Kind::TunnelRejected(_)));
    assert!(err.is_protocol());
    assert_eq!(err.status().map(|s| s.as_u16()), Some(407));
    assert!(upstream.was_closed());

    // the proxy's echo loop only ends once the client side is gone
    proxy.join();
}

#[test]
fn malformed_response_is_a_parse_error() {
    let proxy = MockProxy::spawn(b"this is not http\r\n\r\n");
    let upstream = Arc::new(RecordingUpstream::default());
    let client = http_client(&proxy, Some(upstream.clone()));

    let err = client.dial("tcp", "destination.test:443").unwrap_err();
    assert!(matches!(err.kind(), Kind::ResponseParse));
    assert!(upstream.was_closed());
    proxy.join();
}

#[test]
fn unreachable_proxy_is_a_connect_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr")
    };
    let client = HttpProxyClient::new("http", &addr.to_string(), "", false, None).expect("client");
    let err = client.dial("tcp", "destination.test:443").unwrap_err();
    assert!(err.is_connect());
    assert_eq!(err.address(), Some(addr.to_string().as_str()));
}

#[test]
fn blocking_upstream_times_out_promptly() {
    let client = HttpProxyClient::new(
        "http",
        "proxy.test:3128",
        "",
        false,
        Some(Arc::new(BlockingUpstream)),
    )
    .expect("client");

    let started = Instant::now();
    let err = client
        .dial_timeout("tcp", "destination.test:443", Duration::from_millis(10))
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(err.is_timeout(), "{err:?}");
    assert!(elapsed >= Duration::from_millis(10));
    assert!(elapsed < Duration::from_millis(50), "took {elapsed:?}");
}

#[test]
fn silent_proxy_times_out_and_the_worker_lets_go() {
    let proxy = MockProxy::silent();
    let upstream = Arc::new(RecordingUpstream::default());
    let client = http_client(&proxy, Some(upstream.clone()));

    let err = client
        .dial_timeout("tcp", "destination.test:443", Duration::from_millis(50))
        .unwrap_err();
    assert!(err.is_timeout());

    // the transport deadline unblocks the worker, which closes its connection
    proxy.join();
    assert!(upstream.was_closed());
}

#[test]
fn generous_budget_leaves_no_deadline_on_the_tunnel() {
    let proxy = MockProxy::spawn(b"HTTP/1.1 200 OK\r\n\r\n");
    let client = http_client(&proxy, None);

    let mut conn = client
        .dial_timeout("tcp4", "destination.test:443", Duration::from_millis(500))
        .expect("dial");
    std::thread::sleep(Duration::from_millis(600));

    conn.write_all(b"late").expect("write after budget");
    let mut buf = [0u8; 4];
    conn.read_exact(&mut buf).expect("read after budget");
    assert_eq!(&buf, b"late");
    conn.close().expect("close");
    proxy.join();
}

#[test]
fn tunnel_exposes_its_proxy_and_tunes_the_raw_socket() {
    let proxy = MockProxy::spawn(b"HTTP/1.1 200 OK\r\n\r\n");
    let client = http_client(&proxy, None);

    let mut conn = client.dial("tcp", "destination.test:443").expect("dial");
    let owner = conn.proxy_client().expect("proxy client");
    assert_eq!(owner.describe(), format!("http://{}", proxy.address()));
    assert_eq!(conn.peer_addr().expect("peer"), proxy.addr);

    conn.set_nodelay(true).expect("nodelay");
    conn.set_linger(Some(Duration::from_secs(1))).expect("linger");
    conn.set_read_buffer(64 * 1024).expect("read buffer");
    conn.set_write_buffer(64 * 1024).expect("write buffer");

    conn.close().expect("close");
    conn.close().expect("second close");
    proxy.join();
}

#[test]
fn proxies_chain_through_each_other() {
    let (destination, _server) = spawn_destination(b"hello from destination");
    let first = MockProxy::forwarding();
    let second = MockProxy::forwarding();

    let inner: Arc<dyn ProxyClient> = Arc::new(http_client(&first, None));
    let outer = http_client(&second, Some(inner));

    let mut conn = outer
        .dial_timeout("tcp", &destination.to_string(), Duration::from_secs(5))
        .expect("dial through chain");
    let mut greeting = [0u8; 22];
    conn.read_exact(&mut greeting).expect("greeting");
    assert_eq!(&greeting, b"hello from destination");

    conn.write_all(b"round trip").expect("write");
    let mut echoed = [0u8; 10];
    conn.read_exact(&mut echoed).expect("echo");
    assert_eq!(&echoed, b"round trip");
    conn.close().expect("close");

    assert!(first.join().starts_with(&format!("CONNECT {} ", second.addr)));
    assert!(second.join().starts_with(&format!("CONNECT {destination} ")));
}
