use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::io::Write;
use std::process::Command; // Run programs
use tempfile;

type STDRESULT = Result<(), Box<dyn std::error::Error>>;

fn write_temp(contents: &[u8]) -> Result<tempfile::NamedTempFile, std::io::Error> {
    let mut f = tempfile::NamedTempFile::new()?;
    f.write_all(contents)?;
    Ok(f)
}

fn roundtrip(data: &[u8], extra_flags: &[&str]) -> STDRESULT {
    let input = write_temp(data)?;
    let compressed = tempfile::NamedTempFile::new()?;
    let decoded = tempfile::NamedTempFile::new()?;

    let mut encode_cmd = Command::cargo_bin("huffman")?;
    encode_cmd
        .arg("-i").arg(input.path())
        .arg("-o").arg(compressed.path())
        .arg("-e")
        .args(extra_flags)
        .assert()
        .success();

    let mut decode_cmd = Command::cargo_bin("huffman")?;
    decode_cmd
        .arg("-i").arg(compressed.path())
        .arg("-o").arg(decoded.path())
        .arg("-d")
        .args(extra_flags)
        .assert()
        .success();

    assert_eq!(std::fs::read(decoded.path())?, data);
    Ok(())
}

#[test]
fn packed_roundtrip() -> STDRESULT {
    roundtrip(b"ABRACADABRA", &[])
}

#[test]
fn ascii_roundtrip() -> STDRESULT {
    roundtrip(b"HELLO WORLD", &["-a"])
}

#[test]
fn empty_input_roundtrip() -> STDRESULT {
    roundtrip(b"", &[])
}

#[test]
fn missing_encode_or_decode_flag_is_a_usage_error() -> STDRESULT {
    let input = write_temp(b"hello")?;
    let out = tempfile::NamedTempFile::new()?;
    Command::cargo_bin("huffman")?
        .arg("-i").arg(input.path())
        .arg("-o").arg(out.path())
        .assert()
        .failure();
    Ok(())
}

#[test]
fn both_encode_and_decode_flags_is_a_usage_error() -> STDRESULT {
    let input = write_temp(b"hello")?;
    let out = tempfile::NamedTempFile::new()?;
    Command::cargo_bin("huffman")?
        .arg("-i").arg(input.path())
        .arg("-o").arg(out.path())
        .arg("-e")
        .arg("-d")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn repeated_input_flag_is_a_usage_error() -> STDRESULT {
    let a = write_temp(b"hello")?;
    let b = write_temp(b"world")?;
    let out = tempfile::NamedTempFile::new()?;
    Command::cargo_bin("huffman")?
        .arg("-i").arg(a.path())
        .arg("-i").arg(b.path())
        .arg("-o").arg(out.path())
        .arg("-e")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn single_distinct_byte_input_is_rejected() -> STDRESULT {
    let input = write_temp(&[b'A'; 16])?;
    let out = tempfile::NamedTempFile::new()?;
    Command::cargo_bin("huffman")?
        .arg("-i").arg(input.path())
        .arg("-o").arg(out.path())
        .arg("-e")
        .assert()
        .failure()
        .stderr(predicate::str::contains("single distinct byte"));
    Ok(())
}

#[test]
fn help_flag_exits_zero() -> STDRESULT {
    Command::cargo_bin("huffman")?.arg("-h").assert().success();
    Ok(())
}

#[test]
fn print_flag_emits_bit_string_to_stdout() -> STDRESULT {
    let input = write_temp(b"AB")?;
    let compressed = tempfile::NamedTempFile::new()?;
    Command::cargo_bin("huffman")?
        .arg("-i").arg(input.path())
        .arg("-o").arg(compressed.path())
        .arg("-e")
        .arg("-p")
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[01]{2}\n$")?);
    Ok(())
}
