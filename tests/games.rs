//! End-to-end games against a live server on a loopback port.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

use war::client::{play_game, run_clients, DEFAULT_TIMEOUT};
use war::server::{Server, ServerConfig};

fn start_server(io_timeout: Option<Duration>) -> SocketAddr {
    let server = Server::bind(ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        io_timeout,
    })
    .unwrap();
    let addr = server.local_addr().unwrap();
    thread::spawn(move || server.serve());
    addr
}

fn read_to_close(stream: &mut TcpStream) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut buf = [0u8; 64];
    loop {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return bytes,
            Ok(n) => bytes.extend_from_slice(&buf[..n]),
        }
    }
}

#[test]
fn two_clients_play_a_full_game() {
    let addr = start_server(None);

    let first = thread::spawn(move || play_game(addr));
    let second = thread::spawn(move || play_game(addr));

    let a = first.join().unwrap().unwrap();
    let b = second.join().unwrap().unwrap();

    assert_eq!(a.rounds(), 26);
    assert_eq!(b.rounds(), 26);
    assert_eq!(a.wins, b.losses);
    assert_eq!(a.losses, b.wins);
    assert_eq!(a.draws, b.draws);
    assert_eq!(a.score(), -b.score());
}

#[test]
fn many_games_run_concurrently() {
    let addr = start_server(None);

    let tally = run_clients(addr, 40, 16, DEFAULT_TIMEOUT);
    assert_eq!(tally.completed, 40);
    assert_eq!(tally.failed, 0);
}

#[test]
fn a_cheater_only_ends_their_own_game() {
    let addr = start_server(None);

    // The cheater and their victim are paired first.
    let mut cheater = TcpStream::connect(addr).unwrap();
    cheater.write_all(&[0x00, 0x00]).unwrap();
    let mut victim = TcpStream::connect(addr).unwrap();
    victim.write_all(&[0x00, 0x00]).unwrap();

    let mut hand = [0u8; 27];
    cheater.read_exact(&mut hand).unwrap();
    let mut victim_hand = [0u8; 27];
    victim.read_exact(&mut victim_hand).unwrap();

    // Honest games keep going next to it.
    let honest = thread::spawn(move || run_clients(addr, 10, 10, DEFAULT_TIMEOUT));

    let stolen = victim_hand[1];
    cheater.write_all(&[0x02, stolen]).unwrap();
    victim.write_all(&[0x02, victim_hand[1]]).unwrap();

    assert!(read_to_close(&mut cheater).is_empty());
    assert!(read_to_close(&mut victim).is_empty());

    let tally = honest.join().unwrap();
    assert_eq!(tally.completed, 10);
}

// Plays a whole game on two raw sockets that already sent WANTGAME, checking
// every byte the server sends back against this pair's own cards.
fn play_pair(mut p1: TcpStream, mut p2: TcpStream) {
    let mut h1 = [0u8; 27];
    let mut h2 = [0u8; 27];
    p1.read_exact(&mut h1).unwrap();
    p2.read_exact(&mut h2).unwrap();
    assert_eq!((h1[0], h2[0]), (0x01, 0x01));

    let mut deck: Vec<u8> = h1[1..].iter().chain(&h2[1..]).copied().collect();
    deck.sort_unstable();
    assert_eq!(deck, (0..52).collect::<Vec<u8>>());

    // Send every play up front; the server reads them round by round.
    for (&c1, &c2) in h1[1..].iter().zip(&h2[1..]) {
        p1.write_all(&[0x02, c1]).unwrap();
        p2.write_all(&[0x02, c2]).unwrap();
    }

    let r1 = read_to_close(&mut p1);
    let r2 = read_to_close(&mut p2);
    assert_eq!(r1.len(), 52);
    assert_eq!(r2.len(), 52);
    assert!(r1.chunks(2).all(|m| m[0] == 0x03 && m[1] <= 2));
    assert!(r2.chunks(2).all(|m| m[0] == 0x03 && m[1] <= 2));

    for (i, (m1, m2)) in r1.chunks(2).zip(r2.chunks(2)).enumerate() {
        let expected = match (h1[i + 1] % 13).cmp(&(h2[i + 1] % 13)) {
            std::cmp::Ordering::Greater => (0, 2),
            std::cmp::Ordering::Equal => (1, 1),
            std::cmp::Ordering::Less => (2, 0),
        };
        assert_eq!((m1[1], m2[1]), expected, "round {}", i);
    }
}

fn want_game(addr: SocketAddr) -> TcpStream {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(&[0x00, 0x00]).unwrap();
    stream
}

#[test]
fn full_game_byte_counts() {
    let addr = start_server(None);

    let p1 = want_game(addr);
    let p2 = want_game(addr);
    play_pair(p1, p2);
}

#[test]
fn concurrent_games_stay_isolated() {
    let addr = start_server(None);

    // Connections are paired in arrival order, so consecutive connects from
    // one thread end up in the same game.
    let pairs: Vec<(TcpStream, TcpStream)> = (0..8)
        .map(|_| (want_game(addr), want_game(addr)))
        .collect();

    let games: Vec<_> = pairs
        .into_iter()
        .map(|(p1, p2)| thread::spawn(move || play_pair(p1, p2)))
        .collect();

    for game in games {
        game.join().unwrap();
    }
}

#[test]
fn silent_player_times_out() {
    let addr = start_server(Some(Duration::from_millis(200)));

    let mut talker = TcpStream::connect(addr).unwrap();
    talker.write_all(&[0x00, 0x00]).unwrap();
    // Connects but never asks for a game.
    let mut mute = TcpStream::connect(addr).unwrap();

    talker
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    assert!(read_to_close(&mut talker).is_empty());
    assert!(read_to_close(&mut mute).is_empty());
}
