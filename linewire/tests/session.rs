use linewire::editor::LineEditor;
use linewire::net::{Transport, TransportBuilder};
use linewire::session::Session;

use std::io::{Read, Write};
use std::net::{SocketAddr, SocketAddrV4, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Spawns a peer that runs `script` on the accepted stream.
fn peer<T, F>(script: F) -> (SocketAddrV4, JoinHandle<T>)
where
    T: Send + 'static,
    F: FnOnce(TcpStream) -> T + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
    let addr = match listener.local_addr().expect("Failed to get local address") {
        SocketAddr::V4(addr) => addr,
        SocketAddr::V6(_) => unreachable!("bound to an IPv4 address"),
    };

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("Failed to accept connection");
        script(stream)
    });

    (addr, handle)
}

fn connected(addr: SocketAddrV4) -> Transport {
    let mut transport = TransportBuilder::new()
        .peer(addr)
        .build()
        .expect("Failed to build transport");
    transport.connect().expect("Failed to connect");
    transport
}

/// The redraw for a line of `width` columns after the cursor moved back
/// `back` columns, blanking `erase` columns first.
fn redraw(erase: usize, line: &[u8], back: usize) -> Vec<u8> {
    let mut out = vec![b'\r'];
    out.extend(std::iter::repeat_n(b' ', erase));
    out.push(b'\r');
    out.extend_from_slice(line);
    out.extend(std::iter::repeat_n(0x08, back));
    out
}

fn read_exactly(stream: &mut TcpStream, len: usize) -> Vec<u8> {
    let mut echoed = vec![0u8; len];
    stream
        .read_exact(&mut echoed)
        .expect("Failed to read from stream");
    echoed
}

#[linewire::timeout_test(5_000)]
fn typed_command_is_echoed_and_completed() {
    let mut expected = Vec::new();
    let typed = b"ls -l";
    for k in 1..=typed.len() {
        expected.extend(redraw(k, &typed[..k], 0));
    }
    expected.extend_from_slice(b"\r\n");
    let expected_len = expected.len();

    let (addr, handle) = peer(move |mut stream| {
        stream.write_all(b"ls -l\r\n").expect("Failed to write to stream");
        read_exactly(&mut stream, expected_len)
    });

    let mut transport = connected(addr);
    let mut editor = LineEditor::new();

    assert_eq!(editor.read_line(&mut transport).expect("read_line"), b"ls -l");
    assert_eq!(editor.width(), 0);
    assert_eq!(editor.max_width(), 0);

    // The trailing LF completes an empty line.
    assert_eq!(editor.read_line(&mut transport).expect("read_line"), b"");

    let echoed = handle.join().expect("Thread panicked");
    assert_eq!(echoed, expected);
}

#[linewire::timeout_test(5_000)]
fn arrows_and_delete_edit_mid_line() {
    let mut expected = Vec::new();
    expected.extend(redraw(1, b"a", 0));
    expected.extend(redraw(2, b"ab", 0));
    expected.extend(redraw(3, b"abc", 0));
    expected.extend(redraw(3, b"abc", 1));
    expected.extend(redraw(3, b"abc", 2));
    expected.extend(redraw(3, b"bc", 2));
    let expected_len = expected.len();

    let (addr, handle) = peer(move |mut stream| {
        stream
            .write_all(b"abc\x1b[D\x1b[D\x7f")
            .expect("Failed to write to stream");
        read_exactly(&mut stream, expected_len)
    });

    let mut transport = connected(addr);
    let mut editor = LineEditor::new();

    // Six keystrokes; escape sequences pull their tail themselves.
    for _ in 0..6 {
        let byte = transport.recv_one(None).expect("Failed to receive");
        assert!(editor.feed(byte, &mut transport).expect("feed").is_none());
    }

    assert_eq!(editor.line(), b"bc");
    assert_eq!(editor.cursor(), 0);
    assert_eq!(editor.width(), 2);
    assert_eq!(editor.max_width(), 3);

    let echoed = handle.join().expect("Thread panicked");
    assert_eq!(echoed, expected);
}

#[linewire::timeout_test(5_000)]
fn lone_escape_clears_the_line_after_the_timeout() {
    let mut expected = Vec::new();
    expected.extend(redraw(1, b"a", 0));
    expected.extend(redraw(2, b"ab", 0));
    expected.extend(redraw(2, b"", 0));
    expected.extend(redraw(1, b"z", 0));
    expected.extend_from_slice(b"\r\n");
    let expected_len = expected.len();

    let (addr, handle) = peer(move |mut stream| {
        stream.write_all(b"ab\x1b").expect("Failed to write to stream");
        thread::sleep(Duration::from_millis(300));
        stream.write_all(b"z\r").expect("Failed to write to stream");
        read_exactly(&mut stream, expected_len)
    });

    let mut transport = connected(addr);
    let mut editor = LineEditor::new();

    assert_eq!(editor.read_line(&mut transport).expect("read_line"), b"z");

    let echoed = handle.join().expect("Thread panicked");
    assert_eq!(echoed, expected);
}

#[linewire::timeout_test(5_000)]
fn session_runs_commands_until_peer_closes() {
    let (addr, handle) = peer(|mut stream| {
        stream
            .write_all(b"echo \"hello  there\"\r")
            .expect("Failed to write to stream");

        let mut seen = Vec::new();
        let mut chunk = [0u8; 256];
        while !seen.ends_with(b"hello  there\r\n") {
            let n = stream.read(&mut chunk).expect("Failed to read from stream");
            assert!(n > 0, "session closed early");
            seen.extend_from_slice(&chunk[..n]);
        }
    });

    let mut transport = connected(addr);
    Session::new(&mut transport).run().expect("session");

    handle.join().expect("Thread panicked");
    transport.disconnect().expect("Failed to disconnect");
}

#[linewire::timeout_test(5_000)]
fn session_recovers_from_invalid_input() {
    let (addr, handle) = peer(|mut stream| {
        stream
            .write_all(b"x\x1bQecho ok\rexit\r")
            .expect("Failed to write to stream");

        let mut rest = Vec::new();
        stream
            .read_to_end(&mut rest)
            .expect("Failed to read from stream");
        rest
    });

    let mut transport = connected(addr);
    Session::new(&mut transport).run().expect("session");
    transport.disconnect().expect("Failed to disconnect");

    let output = handle.join().expect("Thread panicked");
    let text = String::from_utf8_lossy(&output);
    assert!(text.contains("\r\nok\r\n"));
}
