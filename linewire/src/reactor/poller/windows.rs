//! Windows platform layer.
//!
//! Mirrors the Unix layer function for function over WinSock. Winsock
//! itself is started and stopped through [`sys_startup`] / [`sys_cleanup`],
//! which the networking subsystem calls on the first acquire and the last
//! release respectively.

use std::io;
use std::mem;
use std::net::{Shutdown, SocketAddr};

use windows_sys::Win32::Networking::WinSock::{
    AF_INET, AF_INET6, FIONBIO, INVALID_SOCKET, SD_BOTH, SD_RECEIVE, SD_SEND, SO_ERROR,
    SOCK_STREAM, SOCKADDR, SOCKADDR_IN, SOCKADDR_IN6, SOCKADDR_STORAGE, SOCKET, SOCKET_ERROR,
    SOL_SOCKET, WSACleanup, WSADATA, WSAEINPROGRESS, WSAEWOULDBLOCK, WSAStartup, closesocket,
    connect, getsockopt, ioctlsocket, recv, send, shutdown, socket,
};

/// Raw socket type on Windows.
pub(crate) type RawFd = SOCKET;

/// Sentinel for "no socket".
pub(crate) const INVALID_FD: RawFd = INVALID_SOCKET;

/// Creates a MAKEWORD value for the Winsock version.
#[inline]
const fn makeword(low: u8, high: u8) -> u16 {
    ((high as u16) << 8) | (low as u16)
}

/// Starts Winsock 2.2 for this process.
pub(crate) fn sys_startup() -> io::Result<()> {
    let mut data: WSADATA = unsafe { mem::zeroed() };
    let rc = unsafe { WSAStartup(makeword(2, 2), &mut data) };
    if rc != 0 {
        return Err(io::Error::from_raw_os_error(rc));
    }
    Ok(())
}

/// Balances a successful [`sys_startup`].
pub(crate) fn sys_cleanup() {
    unsafe {
        let _ = WSACleanup();
    }
}

/// Reads from a socket into the given buffer.
///
/// Returns the number of bytes read, or `-1` on error.
pub(crate) fn sys_read(fd: RawFd, buffer: &mut [u8]) -> isize {
    let len = buffer.len().min(i32::MAX as usize) as i32;
    let rc = unsafe { recv(fd, buffer.as_mut_ptr(), len, 0) };
    if rc == SOCKET_ERROR { -1 } else { rc as isize }
}

/// Writes the buffer to a socket.
///
/// Returns the number of bytes written, or `-1` on error.
pub(crate) fn sys_write(fd: RawFd, buffer: &[u8]) -> isize {
    let len = buffer.len().min(i32::MAX as usize) as i32;
    let rc = unsafe { send(fd, buffer.as_ptr(), len, 0) };
    if rc == SOCKET_ERROR { -1 } else { rc as isize }
}

/// Closes a socket.
pub(crate) fn sys_close(fd: RawFd) {
    unsafe {
        let _ = closesocket(fd);
    }
}

/// Sets a socket to non-blocking mode.
pub(crate) fn sys_set_nonblocking(fd: RawFd) -> io::Result<()> {
    let mut nonblocking: u32 = 1;
    if unsafe { ioctlsocket(fd, FIONBIO, &mut nonblocking) } != 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// Creates a non-blocking stream socket for the family of `addr`.
pub(crate) fn sys_socket(addr: &SocketAddr) -> io::Result<RawFd> {
    let domain = match addr {
        SocketAddr::V4(_) => AF_INET,
        SocketAddr::V6(_) => AF_INET6,
    };

    let fd = unsafe { socket(domain as i32, SOCK_STREAM, 0) };
    if fd == INVALID_SOCKET {
        return Err(io::Error::last_os_error());
    }

    if let Err(e) = sys_set_nonblocking(fd) {
        sys_close(fd);
        return Err(e);
    }

    Ok(fd)
}

/// Initiates a non-blocking connection.
///
/// `Ok(true)` means the handshake already completed, `Ok(false)` that it is
/// in progress and the socket must be polled for writability.
pub(crate) fn sys_connect(fd: RawFd, addr: &SocketAddr) -> io::Result<bool> {
    let (storage, len) = socketaddr_to_storage(addr);

    let rc = unsafe { connect(fd, &storage as *const _ as *const SOCKADDR, len) };
    if rc == 0 {
        return Ok(true);
    }

    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(WSAEWOULDBLOCK) | Some(WSAEINPROGRESS) => Ok(false),
        _ => Err(err),
    }
}

/// Retrieves the pending socket error via `SO_ERROR`.
pub(crate) fn sys_get_socket_error(fd: RawFd) -> io::Result<()> {
    let mut err: i32 = 0;
    let mut len = mem::size_of::<i32>() as i32;

    let rc = unsafe {
        getsockopt(
            fd,
            SOL_SOCKET,
            SO_ERROR,
            &mut err as *mut _ as *mut u8,
            &mut len,
        )
    };

    if rc != 0 {
        Err(io::Error::last_os_error())
    } else if err != 0 {
        Err(io::Error::from_raw_os_error(err))
    } else {
        Ok(())
    }
}

/// Shuts down part or all of a socket connection.
pub(crate) fn sys_shutdown(fd: RawFd, how: Shutdown) -> io::Result<()> {
    let how = match how {
        Shutdown::Read => SD_RECEIVE,
        Shutdown::Write => SD_SEND,
        Shutdown::Both => SD_BOTH,
    };

    if unsafe { shutdown(fd, how) } != 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// Converts a `SocketAddr` to a `SOCKADDR_STORAGE`.
fn socketaddr_to_storage(addr: &SocketAddr) -> (SOCKADDR_STORAGE, i32) {
    let mut storage: SOCKADDR_STORAGE = unsafe { mem::zeroed() };
    match addr {
        SocketAddr::V4(v4) => {
            let sa = unsafe { &mut *(&mut storage as *mut _ as *mut SOCKADDR_IN) };
            sa.sin_family = AF_INET;
            sa.sin_port = v4.port().to_be();
            sa.sin_addr.S_un.S_addr = u32::from(*v4.ip()).to_be();
            (storage, mem::size_of::<SOCKADDR_IN>() as i32)
        }
        SocketAddr::V6(v6) => {
            let sa = unsafe { &mut *(&mut storage as *mut _ as *mut SOCKADDR_IN6) };
            sa.sin6_family = AF_INET6;
            sa.sin6_port = v6.port().to_be();
            sa.sin6_addr.u.Byte = v6.ip().octets();
            sa.Anonymous.sin6_scope_id = v6.scope_id();
            (storage, mem::size_of::<SOCKADDR_IN6>() as i32)
        }
    }
}
