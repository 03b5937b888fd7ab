use super::*;
use serde_json::json;

#[test]
fn nested_record_flattens_to_single_chunk() {
    let record = json!({"fees": {"tuition": {"b_tech": "4 lakhs"}}});

    let chunks = flatten_record(&record, "fees", 400);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Fees Tuition B Tech: 4 lakhs.");
    assert_eq!(chunks[0].id, "fees_0");
    assert_eq!(chunks[0].metadata.source, "fees");
    assert_eq!(chunks[0].metadata.doc_type, STRUCTURED_DATA_TYPE);
}

#[test]
fn empty_record_yields_no_chunks() {
    assert!(flatten_record(&json!({}), "fees", 400).is_empty());
    assert!(flatten_record(&json!({"nested": {}}), "fees", 400).is_empty());
    assert!(flatten_record(&json!({"nested": []}), "fees", 400).is_empty());
}

#[test]
fn sequence_elements_share_the_prefix() {
    let record = json!({"sports": ["Cricket", "Football"]});

    let chunks = flatten_record(&record, "facilities", 400);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Sports: Cricket Sports: Football.");
}

#[test]
fn numbers_and_booleans_render_as_text() {
    let record = json!({"established": 1957, "residential": true});

    let chunks = flatten_record(&record, "official_info", 400);

    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].text.contains("Established: 1957"));
    assert!(chunks[0].text.contains("Residential: true"));
}

#[test]
fn keys_are_humanized() {
    let record = json!({"hostel_mess_timings": "7 AM to 9 AM"});

    let chunks = flatten_record(&record, "hostels", 400);

    assert_eq!(chunks[0].text, "Hostel Mess Timings: 7 AM to 9 AM.");
}

#[test]
fn flatten_is_deterministic() {
    let record = json!({
        "programs": {"b_tech": "4 years", "m_tech": "2 years"},
        "intake": 400,
    });

    let first = flatten_record(&record, "courses", 400);
    let second = flatten_record(&record, "courses", 400);

    assert_eq!(first, second);
}

#[test]
fn chunk_ids_are_sequential_per_source() {
    let paragraph = (0..20)
        .map(|i| format!("This is filler sentence number {} with some padding text", i))
        .collect::<Vec<_>>()
        .join(". ");
    let record = json!({"notes": paragraph});

    let chunks = flatten_record(&record, "facilities", 200);

    assert!(chunks.len() > 1);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.id, format!("facilities_{}", i));
    }
}

#[test]
fn chunks_respect_the_character_budget() {
    let paragraph = (0..30)
        .map(|i| format!("Sentence {} carries a moderate amount of descriptive text", i))
        .collect::<Vec<_>>()
        .join(". ");
    let record = json!({"notes": paragraph});

    let chunks = flatten_record(&record, "facilities", 400);

    for chunk in &chunks {
        assert!(
            chunk.text.len() <= 400,
            "chunk {} exceeds budget at {} chars",
            chunk.id,
            chunk.text.len()
        );
    }
}

#[test]
fn oversized_sentence_becomes_its_own_chunk() {
    let long_value = "x".repeat(600);
    let record = json!({"short": "A brief note", "long": long_value});

    let chunks = flatten_record(&record, "fees", 400);

    let oversized = chunks
        .iter()
        .find(|c| c.text.len() > 400)
        .expect("oversized sentence should survive as a chunk");
    assert!(oversized.text.contains(&"x".repeat(600)));
}

#[test]
fn concatenated_chunks_reconstruct_the_flat_text() {
    let record = json!({
        "library": {
            "collection": "The collection holds over 300000 printed volumes. \
                Journal subscriptions number above 1500. The digital library \
                adds 50000 e-books. Members borrow up to five books at a time",
            "hours": "Weekday hours run 8 AM to 10 PM. Weekend hours are shorter",
        }
    });

    let whole = flatten_record(&record, "facilities", 4096);
    assert_eq!(whole.len(), 1);
    let full_text = whole[0]
        .text
        .strip_suffix('.')
        .expect("chunk text ends with a period")
        .to_string();

    let split = flatten_record(&record, "facilities", 100);
    assert!(split.len() > 1);
    let rejoined = split
        .iter()
        .map(|c| c.text.strip_suffix('.').expect("terminated chunk"))
        .collect::<Vec<_>>()
        .join(". ");

    assert_eq!(rejoined, full_text);
}
