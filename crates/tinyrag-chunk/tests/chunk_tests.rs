use tinyrag_chunk::{build_chunker, FixedSizeChunker, RuleBasedChunker};
use tinyrag_core::traits::ChunkingStrategy;
use tinyrag_core::types::{Chunk, ChunkingConfig};
use tinyrag_core::Error;

fn sample_text(len: usize) -> String {
    "smart farm sensors measure temperature. ".chars().cycle().take(len).collect()
}

fn assert_covers(chunks: &[Chunk], total: usize, chunk_size: usize, overlap: usize) {
    assert!(!chunks.is_empty());
    assert_eq!(chunks[0].start, 0, "coverage starts at 0");
    assert_eq!(chunks.last().unwrap().end, total, "coverage ends at text length");
    for pair in chunks.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(b.start <= a.end, "gap between {}..{} and {}..{}", a.start, a.end, b.start, b.end);
        assert_eq!(b.start, a.start + chunk_size - overlap);
    }
    for c in chunks {
        assert_eq!(c.end - c.start, chunk_size.min(total - c.start));
        assert_eq!(c.length, c.end - c.start);
    }
}

#[test]
fn fixed_thousand_chars_with_overlap_covers_text() {
    let text = sample_text(1000);
    let chunker = FixedSizeChunker::new(300, 50).expect("chunker");
    let chunks = chunker.chunk(&text);

    assert_covers(&chunks, 1000, 300, 50);
    assert_eq!(chunks.len(), 4);
    let lengths: Vec<usize> = chunks.iter().map(|c| c.length).collect();
    assert_eq!(lengths, vec![300, 300, 300, 250], "last chunk is clamped");
    let ids: Vec<usize> = chunks.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
}

#[test]
fn fixed_coverage_over_many_parameters() {
    for total in [1usize, 7, 50, 123, 999] {
        let text = sample_text(total);
        for chunk_size in [3usize, 10, 64, 200] {
            for overlap in [0usize, 1, chunk_size / 2, chunk_size - 1] {
                let chunks = FixedSizeChunker::new(chunk_size, overlap).unwrap().chunk(&text);
                assert_covers(&chunks, total, chunk_size, overlap);
            }
        }
    }
}

#[test]
fn fixed_consecutive_full_chunks_share_exact_overlap() {
    let text = sample_text(640);
    let overlap = 40;
    let chunks = FixedSizeChunker::new(128, overlap).unwrap().chunk(&text);
    for pair in chunks.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.end < text.len() {
            assert_eq!(a.end - b.start, overlap);
            let tail: String = a.text.chars().skip(a.length - overlap).collect();
            let head: String = b.text.chars().take(overlap).collect();
            assert_eq!(tail, head);
        }
    }
}

#[test]
fn fixed_chunking_is_deterministic() {
    let text = sample_text(777);
    let chunker = FixedSizeChunker::new(100, 30).unwrap();
    assert_eq!(chunker.chunk(&text), chunker.chunk(&text));
}

#[test]
fn fixed_skips_blank_windows_without_stopping() {
    let text = format!("abc{}def", " ".repeat(10));
    let chunks = FixedSizeChunker::new(3, 0).unwrap().chunk(&text);

    let summary: Vec<(usize, &str, usize)> = chunks.iter().map(|c| (c.id, c.text.as_str(), c.start)).collect();
    assert_eq!(summary, vec![(0, "abc", 0), (1, " de", 12), (2, "f", 15)]);
}

#[test]
fn fixed_huge_chunk_size_does_not_overflow() {
    let chunker = FixedSizeChunker::new(usize::MAX, usize::MAX - 1).unwrap();
    let chunks = chunker.chunk("ab");
    let spans: Vec<(&str, usize, usize)> = chunks.iter().map(|c| (c.text.as_str(), c.start, c.end)).collect();
    assert_eq!(spans, vec![("ab", 0, 2), ("b", 1, 2)]);

    let chunks = FixedSizeChunker::new(usize::MAX, 0).unwrap().chunk("abc");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].length, 3);
}

#[test]
fn fixed_uses_character_offsets() {
    let chunks = FixedSizeChunker::new(3, 1).unwrap().chunk("가나다라마바사");
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["가나다", "다라마", "마바사", "사"]);
    assert_eq!((chunks[1].start, chunks[1].end, chunks[1].length), (2, 5, 3));
}

#[test]
fn empty_and_blank_input_yield_no_chunks() {
    let fixed = FixedSizeChunker::new(10, 2).unwrap();
    assert!(fixed.chunk("").is_empty());
    assert!(fixed.chunk("   \n\t  ").is_empty());
    let sentences = RuleBasedChunker::sentences(10).unwrap();
    assert!(sentences.chunk("").is_empty());
}

#[test]
fn invalid_parameters_fail_at_construction() {
    assert!(matches!(FixedSizeChunker::new(0, 0), Err(Error::Configuration(_))));
    assert!(matches!(FixedSizeChunker::new(5, 5), Err(Error::Configuration(_))));
    assert!(matches!(FixedSizeChunker::new(5, 9), Err(Error::Configuration(_))));
    assert!(matches!(RuleBasedChunker::sentences(0), Err(Error::Configuration(_))));
    assert!(matches!(RuleBasedChunker::paragraphs(10, ""), Err(Error::Configuration(_))));
    assert!(build_chunker(&ChunkingConfig::Fixed { chunk_size: 4, overlap: 4 }).is_err());
}

#[test]
fn sentences_are_packed_greedily() {
    let text = "One two. Three four! Five six? Seven.";
    let chunks = RuleBasedChunker::sentences(20).unwrap().chunk(text);

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["One two. Three four!", "Five six? Seven."]);
    assert_eq!((chunks[0].id, chunks[0].start, chunks[0].end), (0, 0, 20));
    assert_eq!((chunks[1].id, chunks[1].start, chunks[1].end), (1, 21, 37));
    assert_eq!(chunks[1].length, 16);
}

#[test]
fn oversized_sentence_forms_its_own_chunk() {
    let chunks = RuleBasedChunker::sentences(5).unwrap().chunk("Short. This sentence is long.");
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Short.", "This sentence is long."]);
    assert_eq!(chunks[1].length, 22, "no truncation");
}

#[test]
fn text_after_last_terminal_mark_is_dropped() {
    let chunker = RuleBasedChunker::sentences(100).unwrap();
    let chunks = chunker.chunk("First sentence.   trailing words  ");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "First sentence.");
    assert_eq!(chunks[0].end, 15);

    assert!(chunker.chunk("no terminal punctuation here").is_empty());
    assert!(chunker.split_units("no terminal punctuation here").is_empty());
}

#[test]
fn sentence_split_is_punctuation_only() {
    let chunker = RuleBasedChunker::sentences(1000).unwrap();
    assert_eq!(chunker.split_units("Dr. Smith arrived."), vec!["Dr.", "Smith arrived."]);
    assert_eq!(chunker.split_units("Pi is 3.14 exactly."), vec!["Pi is 3.", "14 exactly."]);
    assert_eq!(chunker.split_units("Really?! Yes."), vec!["Really?", "!", "Yes."]);
}

#[test]
fn paragraphs_join_with_separator() {
    let text = "Para one text.\n\nPara two text.\n\n\n\nPara three is longer than the limit by far.";
    let chunker = build_chunker(&ChunkingConfig::Paragraph { max_size: 30, separator: "\n\n".into() }).unwrap();
    assert_eq!(chunker.name(), "paragraph");

    let chunks = chunker.chunk(text);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "Para one text.\n\nPara two text.");
    assert_eq!(chunks[1].text, "Para three is longer than the limit by far.");
    assert_eq!(chunks[1].end, text.len());
}

#[test]
fn korean_sentences_keep_char_offsets() {
    let text = "스마트팜은 ICT 기술을 활용합니다. 센서로 환경을 측정합니다.";
    let chunks = RuleBasedChunker::sentences(18).unwrap().chunk(text);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "스마트팜은 ICT 기술을 활용합니다.");
    assert_eq!(chunks[1].end, text.chars().count());
    assert_eq!(chunks[1].length, chunks[1].end - chunks[1].start);
}

#[test]
fn chunks_serialize_with_all_fields() {
    let chunks = FixedSizeChunker::new(4, 0).unwrap().chunk("abcdef");
    let json = serde_json::to_value(&chunks[1]).unwrap();
    assert_eq!(json, serde_json::json!({"id": 1, "text": "ef", "start": 4, "end": 6, "length": 2}));
}
