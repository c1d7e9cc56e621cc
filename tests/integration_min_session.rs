// Drives the compiled binary through a PTY so the real event loop and
// crossterm input handling are exercised end to end.
//
// Needs a TTY (expectrl allocates a pseudo terminal), so it is Unix-only
// and ignored by default:
//   cargo test --test integration_min_session -- --ignored

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn page_opens_and_quits() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("vitrine.log");
    let bin = assert_cmd::cargo::cargo_bin("vitrine");
    let cmd = format!(
        "{} --reduced-motion --log-file {}",
        bin.display(),
        log.display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(300));

    // scroll a little, open and close the menu, then quit
    p.send("jjj")?;
    p.send("m")?;
    p.send("m")?;
    std::thread::sleep(Duration::from_millis(200));
    p.send("q")?;

    p.expect(Eof)?;
    assert!(std::fs::read_to_string(&log)?.contains("page opened"));
    Ok(())
}
