use std::io::Cursor;

use crate::errors::VocabularyError;
use crate::vocabulary::{read_fasttext_bin, read_fasttext_vec, read_word_list, Vocabulary};

/// Builds the header and dictionary of a fastText `.bin` model.
/// Entries are (word, type) with type 0 = word, 1 = label.
fn fasttext_bin(entries: &[(&str, i8)]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&793712314i32.to_le_bytes());
    buf.extend_from_slice(&12i32.to_le_bytes());
    for arg in [300, 5, 5, 5, 5, 1, 2, 1, 2_000_000, 5, 5, 100] {
        buf.extend_from_slice(&(arg as i32).to_le_bytes());
    }
    buf.extend_from_slice(&1e-4f64.to_le_bytes());

    let nwords = entries.iter().filter(|(_, t)| *t == 0).count() as i32;
    buf.extend_from_slice(&(entries.len() as i32).to_le_bytes());
    buf.extend_from_slice(&nwords.to_le_bytes());
    buf.extend_from_slice(&(entries.len() as i32 - nwords).to_le_bytes());
    buf.extend_from_slice(&1000i64.to_le_bytes());
    buf.extend_from_slice(&(-1i64).to_le_bytes());

    for (word, entry_type) in entries {
        buf.extend_from_slice(word.as_bytes());
        buf.push(0);
        buf.extend_from_slice(&10i64.to_le_bytes());
        buf.push(*entry_type as u8);
    }

    // the vectors would follow; make sure they are never read
    buf.extend_from_slice(&[0xff; 32]);
    buf
}

#[test]
fn fasttext_bin_returns_words_in_order() {
    let bytes = fasttext_bin(&[("</s>", 0), ("yang", 0), ("Dan", 0), ("__label__x", 1)]);

    let words = read_fasttext_bin(Cursor::new(bytes)).unwrap();

    assert_eq!(words, vec!["</s>", "yang", "Dan"]);
}

#[test]
fn fasttext_bin_rejects_bad_magic() {
    let mut bytes = fasttext_bin(&[("a", 0)]);
    bytes[0] = 0;

    assert!(matches!(
        read_fasttext_bin(Cursor::new(bytes)),
        Err(VocabularyError::BadMagic(_))
    ));
}

#[test]
fn fasttext_bin_rejects_newer_version() {
    let mut bytes = fasttext_bin(&[("a", 0)]);
    bytes[4..8].copy_from_slice(&13i32.to_le_bytes());

    assert!(matches!(
        read_fasttext_bin(Cursor::new(bytes)),
        Err(VocabularyError::UnsupportedVersion(13))
    ));
}

#[test]
fn fasttext_bin_truncated_dictionary() {
    let bytes = fasttext_bin(&[("satu", 0), ("dua", 0)]);
    // header is 4 + 4 + 48 + 8 + 4 + 4 + 4 + 8 + 8 bytes, cut inside "dua"
    let cut = 92 + "satu".len() + 1 + 8 + 1 + 2;

    assert!(matches!(
        read_fasttext_bin(Cursor::new(bytes[..cut].to_vec())),
        Err(VocabularyError::Truncated(_))
    ));
}

#[test]
fn vec_format_takes_first_column() {
    let text = "3 2\nSaya 0.1 0.2\nkamu 0.3 0.4\nmereka 0.5 0.6\n";

    let words = read_fasttext_vec(Cursor::new(text)).unwrap();

    assert_eq!(words, vec!["Saya", "kamu", "mereka"]);
}

#[test]
fn vec_format_requires_header() {
    assert!(matches!(
        read_fasttext_vec(Cursor::new("saya 0.1 0.2\n")),
        Err(VocabularyError::BadHeader(_))
    ));
}

#[test]
fn word_list_skips_blank_lines() {
    let words = read_word_list(Cursor::new("baik\n\n  buruk \n")).unwrap();

    assert_eq!(words, vec!["baik", "buruk"]);
}

#[test]
fn load_picks_format_by_extension_and_lowercases() {
    let tmp = tempfile::tempdir().unwrap();
    let bin = tmp.path().join("cc.id.300.bin");
    std::fs::write(&bin, fasttext_bin(&[("Indonesia", 0), ("__label__a", 1)])).unwrap();
    let list = tmp.path().join("words.txt");
    std::fs::write(&list, "Bahagia\nSedih\n").unwrap();

    let from_bin = Vocabulary::load(&bin).unwrap();
    let from_list = Vocabulary::load(&list).unwrap();

    assert_eq!(from_bin.iter().collect::<Vec<_>>(), vec!["indonesia"]);
    assert_eq!(from_list.iter().collect::<Vec<_>>(), vec!["bahagia", "sedih"]);
}

#[test]
fn load_missing_file_is_io_error() {
    let tmp = tempfile::tempdir().unwrap();

    assert!(matches!(
        Vocabulary::load(&tmp.path().join("missing.bin")),
        Err(VocabularyError::IO(_))
    ));
}

#[test]
fn truncate_limits_words() {
    let mut vocab = Vocabulary::new(vec!["a".into(), "b".into(), "c".into()]);
    vocab.truncate(2);

    assert_eq!(vocab.len(), 2);
}

#[test]
fn vec_header_count_is_not_trusted() {
    let text = "100000000000000 3\nsaya 0.1 0.2 0.3\n";

    let words = read_fasttext_vec(Cursor::new(text)).unwrap();

    assert_eq!(words, vec!["saya"]);
}

#[test]
fn bin_huge_dictionary_size_is_truncated_not_allocated() {
    let mut bytes = fasttext_bin(&[("satu", 0)]);
    // size and nwords sit right after the 64-byte model header
    bytes[64..68].copy_from_slice(&i32::MAX.to_le_bytes());
    bytes[68..72].copy_from_slice(&i32::MAX.to_le_bytes());

    assert!(matches!(
        read_fasttext_bin(Cursor::new(bytes)),
        Err(VocabularyError::Truncated(_))
    ));
}
