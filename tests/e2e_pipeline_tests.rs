use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use line_sharder::{classify, Error, Outcome, ShardConfig, ShardEngine, SilentReporter};

fn engine_in(output_dir: &Path, workers: usize) -> ShardEngine {
    ShardEngine::new(ShardConfig {
        workers: Some(workers),
        output_dir: Some(output_dir.to_path_buf()),
        ..ShardConfig::default()
    })
}

/// All shard files under `root`, sorted by path.
fn shard_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(shard_files(&path));
            } else if path.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|s| s.to_string())
        .collect()
}

/// A mixed corpus with duplicates, blank lines, padding and mixed case.
fn corpus() -> String {
    let mut text = String::new();
    let words = [
        "alpha", "Alpha", "alphabet", "amber", "beta", "Beta", "bravo", "b", "charlie",
        "Chaplin", "c", "delta", "x-ray", "Xylophone", "42", "4", "#hash", "édith", "Élan",
    ];
    for round in 0..3 {
        for word in words {
            text.push_str(word);
            text.push('\n');
            if round == 1 {
                text.push_str(&format!("   {}\t\n", word));
                text.push_str("   \n");
            }
        }
    }
    text.push('\n');
    text
}

#[test]
fn test_full_shard_pipeline_scenario() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("fruit.txt");
    fs::write(&input, "Banana\napple\nbanana\nApple\nb\n").unwrap();

    let result = engine_in(tmp.path(), 2).run(&input, &SilentReporter).unwrap();
    let root = tmp.path().join("fruit");
    assert_eq!(result.root, root);

    assert_eq!(read_lines(&root.join("a").join("ap.txt")), vec!["Apple", "apple"]);
    assert_eq!(read_lines(&root.join("b").join("ba.txt")), vec!["Banana", "banana"]);
    assert_eq!(read_lines(&root.join("b").join("bb.txt")), vec!["b"]);
    assert_eq!(shard_files(&root).len(), 3);

    assert_eq!(result.summary.written(), 3);
    assert_eq!(result.summary.failed(), 0);
    assert_eq!(result.summary.lines_written(), 5);
}

#[test]
fn test_every_line_lands_once_sorted_and_unique() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("corpus.txt");
    let text = corpus();
    fs::write(&input, &text).unwrap();

    let result = engine_in(tmp.path(), 4).run(&input, &SilentReporter).unwrap();
    let root = result.root.clone();

    let expected: HashSet<String> = text
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    for file in shard_files(&root) {
        let lines = read_lines(&file);
        assert!(!lines.is_empty(), "{} is empty", file.display());

        // Strictly ascending means sorted and duplicate free.
        for pair in lines.windows(2) {
            assert!(
                pair[0].as_bytes() < pair[1].as_bytes(),
                "{} not strictly sorted: {:?} >= {:?}",
                file.display(),
                pair[0],
                pair[1]
            );
        }

        for line in lines {
            let key = classify(&line);
            assert_eq!(file, root.join(&key.directory).join(format!("{}.txt", key.stem)));
            assert!(seen.insert(line.clone()), "{} written twice", line);
        }
    }
    assert_eq!(seen, expected);
    assert_eq!(result.ingest_stats.distinct_lines, expected.len());
    assert_eq!(result.summary.lines_written(), expected.len());
}

#[test]
fn test_single_character_lines() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("letters.txt");
    fs::write(&input, "a\nA\nab\n").unwrap();

    engine_in(tmp.path(), 1).run(&input, &SilentReporter).unwrap();
    let root = tmp.path().join("letters");
    assert_eq!(read_lines(&root.join("a").join("aa.txt")), vec!["A", "a"]);
    assert_eq!(read_lines(&root.join("a").join("ab.txt")), vec!["ab"]);
}

#[test]
fn test_blank_lines_produce_no_bucket() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("blank.txt");
    fs::write(&input, "\n   \n\t\t\n\n").unwrap();

    let result = engine_in(tmp.path(), 2).run(&input, &SilentReporter).unwrap();
    assert!(result.summary.outcomes.is_empty());
    assert_eq!(result.ingest_stats.blank_lines, 4);
    assert!(!tmp.path().join("blank").exists());
}

#[test]
fn test_rerun_is_byte_identical() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("corpus.txt");
    fs::write(&input, corpus()).unwrap();
    let engine = engine_in(tmp.path(), 3);

    let first = engine.run(&input, &SilentReporter).unwrap();
    let snapshot: Vec<(PathBuf, Vec<u8>)> = shard_files(&first.root)
        .into_iter()
        .map(|p| {
            let bytes = fs::read(&p).unwrap();
            (p, bytes)
        })
        .collect();

    let second = engine.run(&input, &SilentReporter).unwrap();
    let again: Vec<(PathBuf, Vec<u8>)> = shard_files(&second.root)
        .into_iter()
        .map(|p| {
            let bytes = fs::read(&p).unwrap();
            (p, bytes)
        })
        .collect();

    assert_eq!(snapshot, again);
    assert_eq!(first.summary.render(), second.summary.render());
}

#[test]
fn test_missing_input_creates_nothing() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("absent.txt");

    let err = engine_in(tmp.path(), 2).run(&input, &SilentReporter).unwrap_err();
    assert!(matches!(err, Error::InputNotFound(_)));
    assert!(!tmp.path().join("absent").exists());
}

#[test]
fn test_unreadable_input_aborts_before_flush() {
    let tmp = tempdir().unwrap();
    // A directory opens fine but fails on the first read.
    let input = tmp.path().join("broken.txt");
    fs::create_dir_all(&input).unwrap();

    let err = engine_in(tmp.path(), 2).run(&input, &SilentReporter).unwrap_err();
    assert!(matches!(err, Error::Read { .. } | Error::Open { .. }));
    assert!(!tmp.path().join("broken").exists());
}

#[test]
fn test_invalid_utf8_lines_are_sharded() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("latin1.txt");
    fs::write(&input, b"caf\xe9\ncafe\nbanana\n").unwrap();

    let result = engine_in(tmp.path(), 2).run(&input, &SilentReporter).unwrap();
    assert_eq!(result.ingest_stats.lossy_lines, 1);
    assert_eq!(result.summary.failed(), 0);

    let root = tmp.path().join("latin1");
    assert_eq!(
        read_lines(&root.join("c").join("ca.txt")),
        vec!["cafe", "caf\u{FFFD}"]
    );
    assert_eq!(read_lines(&root.join("b").join("ba.txt")), vec!["banana"]);
}

#[test]
fn test_path_like_lines_stay_inside_root() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("out");
    let input = tmp.path().join("paths.txt");
    fs::write(&input, "/etc/passwd\n./x\n..\n/\nusr/bin\n").unwrap();

    let result = engine_in(&out, 2).run(&input, &SilentReporter).unwrap();
    let root = out.join("paths");
    assert_eq!(result.summary.failed(), 0);
    for outcome in &result.summary.outcomes {
        assert!(outcome.path().starts_with(&root), "{} escapes", outcome.path().display());
    }

    // Every written file sits under the shard root and nothing else under `out`.
    let written: usize = shard_files(&root).iter().map(|f| read_lines(f).len()).sum();
    assert_eq!(written, 5);
    assert_eq!(shard_files(&out).len(), shard_files(&root).len());
    assert_eq!(read_lines(&root.join("e.txt")), vec!["/etc/passwd"]);
}

#[test]
fn test_directory_failure_is_isolated() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("fruit.txt");
    fs::write(&input, "apple\navocado\nbanana\ncherry\nblueberry\n").unwrap();

    // A regular file where the `b` directory belongs.
    let root = tmp.path().join("fruit");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("b"), "in the way").unwrap();

    let result = engine_in(tmp.path(), 2).run(&input, &SilentReporter).unwrap();
    let summary = &result.summary;
    assert_eq!(summary.outcomes.len(), 5);
    assert_eq!(summary.failed(), 2);
    assert_eq!(summary.written(), 3);

    for outcome in &summary.outcomes {
        if let Outcome::Failed { path, .. } = outcome {
            assert!(path.starts_with(root.join("b")));
            assert!(outcome.to_string().starts_with("Error creating directory"));
        }
    }

    assert_eq!(read_lines(&root.join("a").join("ap.txt")), vec!["apple"]);
    assert_eq!(read_lines(&root.join("a").join("av.txt")), vec!["avocado"]);
    assert_eq!(read_lines(&root.join("c").join("ch.txt")), vec!["cherry"]);

    let rendered = summary.render();
    assert_eq!(rendered.lines().count(), 5 + 3);
    assert!(rendered.contains("Error creating directory"));
    assert!(rendered.ends_with("Duplicates removed and entries sorted alphabetically.\n"));
}
