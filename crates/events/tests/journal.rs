//! Journal persistence and replay

use acad_events::{BlockJournal, JournalError, JournalReader};
use acad_ledger::{ClientIdentity, Invocation, LedgerClock, LedgerError, MemoryLedger, StateReader};
use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

fn registrar() -> Invocation {
    Invocation::new(ClientIdentity::new("registrar", "NITWarangalMSP"))
}

fn put(ledger: &mut MemoryLedger, key: &str, value: &str) {
    ledger
        .submit(registrar(), |ctx| {
            ctx.put_state(key, value.as_bytes().to_vec())?;
            ctx.set_event("Written", &key)?;
            Ok::<_, LedgerError>(())
        })
        .unwrap();
}

#[test]
fn test_journal_and_replay() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 23, 0, 0).unwrap();

    {
        let journal = BlockJournal::new(dir.path())?;
        let mut ledger = MemoryLedger::new()
            .with_clock(LedgerClock::Fixed(start))
            .with_sink(Box::new(journal));

        put(&mut ledger, "a", "1");
        ledger.advance(Duration::hours(2));
        put(&mut ledger, "b", "2");
        put(&mut ledger, "a", "3");
    }

    let reader = JournalReader::from_directory(dir.path())?;
    assert_eq!(reader.count()?, 3);
    assert_eq!(reader.last_block()?.map(|b| b.number), Some(3));

    let replayed = MemoryLedger::replay(reader.read_all()?)?;
    assert_eq!(replayed.height(), 3);
    assert_eq!(replayed.get_committed("a")?, Some(b"3".to_vec()));
    assert_eq!(replayed.get_committed("b")?, Some(b"2".to_vec()));
    assert!(replayed.last_block().unwrap().has_event("Written"));

    Ok(())
}

#[test]
fn test_rotation_by_block_date() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 23, 0, 0).unwrap();

    let journal = BlockJournal::new(dir.path())?;
    let mut ledger = MemoryLedger::new()
        .with_clock(LedgerClock::Fixed(start))
        .with_sink(Box::new(journal));
    put(&mut ledger, "a", "1");
    ledger.advance(Duration::hours(2));
    put(&mut ledger, "b", "2");
    drop(ledger);

    let mut names: Vec<String> = std::fs::read_dir(dir.path())?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    names.sort();
    assert_eq!(names, vec!["2026-03-01.jsonl", "2026-03-02.jsonl"]);

    Ok(())
}

#[test]
fn test_out_of_order_append_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut ledger = MemoryLedger::new();
    put(&mut ledger, "a", "1");
    put(&mut ledger, "b", "2");

    let mut journal = BlockJournal::new(dir.path())?;
    let second = ledger.blocks()[1].clone();
    let result = journal.append(&second);
    assert!(matches!(
        result,
        Err(JournalError::OutOfOrder {
            expected: 1,
            actual: 2
        })
    ));

    let mut resumed = BlockJournal::new(dir.path())?.resume_after(1);
    resumed.append(&second)?;
    Ok(())
}

#[test]
fn test_empty_directory() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let reader = JournalReader::from_directory(dir.path().join("missing"))?;
    assert_eq!(reader.count()?, 0);
    assert!(reader.last_block()?.is_none());
    assert!(reader.read_all()?.is_empty());
    Ok(())
}
