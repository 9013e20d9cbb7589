//! Integration tests driving a full session through the command protocol.

use std::fs;

use mendel_sim::errors::CommandError;
use mendel_sim::session::{Reply, Session, SessionConfig};
use tempfile::tempdir;

/// Helper to create a seeded session with a pea-plant gene pair
fn pea_session(seed: u64) -> Session {
    let mut session = Session::new(SessionConfig::seeded(seed));
    for line in ["/add A a tall short", "/add B b round wrinkled"] {
        assert!(matches!(session.process(line), Reply::Output(_)));
    }
    session
}

fn run_script(session: &mut Session, script: &str) -> Vec<Reply> {
    script.lines().map(|line| session.process(line)).collect()
}

#[test]
fn test_dihybrid_cross_preserves_structure() {
    let mut session = pea_session(11);
    let replies = run_script(
        &mut session,
        "/create F1\n/change F1 AaBb add 64\n/mode F1 cross\n/runs 3",
    );
    assert!(replies.iter().all(|r| matches!(r, Reply::Output(_))));

    let pop = session.group("F1").unwrap();
    assert_eq!(pop.generation(), 3);
    assert_eq!(pop.size(), 8);
    for genotype in pop.organisms() {
        let text = genotype.to_string();
        assert_eq!(text.len(), 4);
        assert!(matches!(&text[..2], "AA" | "Aa" | "aa"));
        assert!(matches!(&text[2..], "BB" | "Bb" | "bb"));
    }
}

#[test]
fn test_seed_reproducibility() {
    let script = "/create G\n/random G 40 2\n/run\n/run";
    let mut a = pea_session(2024);
    let mut b = pea_session(2024);
    run_script(&mut a, script);
    run_script(&mut b, script);

    let left: Vec<String> = a.group("G").unwrap().organisms().iter().map(|g| g.to_string()).collect();
    let right: Vec<String> = b.group("G").unwrap().organisms().iter().map(|g| g.to_string()).collect();
    assert_eq!(left.len(), 10);
    assert_eq!(left, right);
}

#[test]
fn test_length_locked_by_first_organism() {
    let mut session = pea_session(1);
    run_script(&mut session, "/create G\n/change G Aa add 2");
    match session.process("/change G AaBb add 1") {
        Reply::Failed(message) => assert!(message.contains("length mismatch")),
        other => panic!("unexpected reply {other:?}"),
    }
    match session.process("/change G aA add 1") {
        Reply::Failed(message) => assert!(message.contains("Dominant allele must come first")),
        other => panic!("unexpected reply {other:?}"),
    }
    assert_eq!(session.group("G").unwrap().size(), 2);
}

#[test]
fn test_batch_file_continues_after_failure() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("commands.txt");
    fs::write(
        &path,
        "# breeding experiment\n\
         /add A a tall short\n\
         \n\
         /create G\n\
         /change G Aa add 10\n\
         /change G Xx add 1\n\
         /change G aa add 10\n\
         /run\n",
    )
    .unwrap();

    let mut session = Session::new(SessionConfig::seeded(5));
    let report = session.load_commands(&path).unwrap();

    assert_eq!(report.lines_scanned, 8);
    assert_eq!(report.executed, 6);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, 6);
    assert!(report.transcript.contains("[line 5] > /change G Aa add 10"));
    assert!(report.render().contains("8 line(s) processed, 6 executed, 1 failed"));

    let pop = session.group("G").unwrap();
    assert_eq!(pop.size(), 10);
    assert_eq!(pop.generation(), 1);
}

#[test]
fn test_batch_file_strips_bom_and_ignores_exit() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("bom.txt");
    fs::write(&path, "\u{feff}/add A a tall short\n/exit\n/create G\n").unwrap();

    let mut session = Session::new(SessionConfig::seeded(5));
    let report = session.load_commands(&path).unwrap();
    assert!(report.failures.is_empty());
    assert!(report.transcript.contains("/exit ignored"));
    assert!(session.group("G").is_some());
    assert_eq!(session.genes().len(), 1);
}

#[test]
fn test_batch_file_errors() {
    let temp = tempdir().unwrap();
    let mut session = Session::new(SessionConfig::seeded(5));

    let missing = temp.path().join("missing.txt");
    assert!(matches!(
        session.load_commands(&missing),
        Err(CommandError::FileNotFound(_))
    ));

    let binary = temp.path().join("binary.txt");
    fs::write(&binary, [0xff, 0xfe, 0x00, 0x41]).unwrap();
    assert!(matches!(
        session.load_commands(&binary),
        Err(CommandError::DecodeError(_))
    ));
}

#[test]
fn test_self_loading_file_hits_depth_limit() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("loop.txt");
    fs::write(&path, format!("/load {}\n", path.display())).unwrap();

    let mut session = Session::new(SessionConfig::seeded(5));
    let report = session.load_commands(&path).unwrap();
    assert!(report.render().contains("nested deeper than 8"));

    // The depth counter is restored once the outer batch returns.
    let fresh = temp.path().join("fresh.txt");
    fs::write(&fresh, "/create G\n").unwrap();
    let report = session.load_commands(&fresh).unwrap();
    assert!(report.failures.is_empty());
}

#[test]
fn test_custom_comment_prefix() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("slashes.txt");
    fs::write(&path, "// not a command\n/create G\n").unwrap();

    let config = SessionConfig::from_json(r#"{"seed": 3, "comment_prefix": "//"}"#).unwrap();
    let mut session = Session::new(config);
    let report = session.load_commands(&path).unwrap();
    assert_eq!(report.executed, 1);
    assert!(report.failures.is_empty());
}

#[test]
fn test_save_then_diverge() {
    let mut session = pea_session(8);
    run_script(&mut session, "/create P\n/change P Aa add 20\n/save P0\n/run P");
    assert_eq!(session.group("P").unwrap().size(), 10);
    assert_eq!(session.group("P0").unwrap().size(), 20);
    assert_eq!(session.current_group(), Some("P"));

    match session.process("/delete A") {
        Reply::Failed(message) => assert!(message.contains("still used")),
        other => panic!("unexpected reply {other:?}"),
    }
    assert!(matches!(session.process("/delete B"), Reply::Output(_)));
}
