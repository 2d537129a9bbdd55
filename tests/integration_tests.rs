//! Integration tests for the score compiler
//!
//! Tests the full pipeline from score text to compiled tracks and backend calls.

use proptest::prelude::*;
use std::io::Write;
use trackscore::playback::{perform, BackendCall, Transcript};
use trackscore::{
    compile, compile_file, compile_with_instruments, parse, Event, InstrumentTable, Note,
    ScoreError, Warning,
};

fn event(pitches: &[i64], duration: i64) -> Event {
    Event {
        pitches: pitches.to_vec(),
        duration,
    }
}

#[test]
fn test_end_to_end_melody() {
    let score = compile("tempo = (120, 2)\ninstrument = piano\n[4] 0 2 4\n").unwrap();
    assert_eq!(score.tempo, 240);
    assert_eq!(score.tracks.len(), 1);
    let track = &score.tracks[0];
    assert_eq!(track.instrument_id, 1);
    assert_eq!(track.instrument_name, "piano");
    assert_eq!(
        track.events,
        vec![event(&[60], 4), event(&[62], 4), event(&[64], 4)]
    );
}

#[test]
fn test_end_to_end_chord() {
    let score = compile("tempo = (120, 2)\ninstrument = piano\n[2] {0 4 7}\n").unwrap();
    assert_eq!(score.tracks[0].events, vec![event(&[60, 64, 67], 2)]);
}

#[test]
fn test_end_to_end_selector() {
    let score =
        compile("tempo = (120, 2)\ninstrument = piano\ninstrument = bass\n<1> [4] 0\n").unwrap();
    assert_eq!(score.tracks[0].instrument_id, 1);
    assert_eq!(score.tracks[0].events, vec![event(&[60], 4)]);
    assert_eq!(score.tracks[1].instrument_id, 2);
    assert_eq!(score.tracks[1].events, vec![event(&[0], 4)]);
}

#[test]
fn test_multi_section_song() {
    let source = r#"
# Two sections, the second one re-uses the piano id
tempo = (60, 4)

instrument = Acoustic Grand Piano, id: 1, volume: 90
instrument = 33, octave: -1
[4] {0 4 7} [4] {5 9 12}
<2> [2] 0 0 - 7

/* bridge */
instrument = Flute, octave: 1
instrument = Acoustic Grand Piano, id: 1
<3> [1] 0 2 4 5
"#;
    let table = InstrumentTable::from_pairs([("Electric Bass (finger)", 33)]);
    let score = compile_with_instruments(source, &table).unwrap();

    assert_eq!(score.tempo, 240);
    assert_eq!(score.track_count, 4);
    assert!(score.warnings.is_empty());

    let summary: Vec<_> = score
        .tracks
        .iter()
        .map(|t| (t.track_number, t.instrument_id, t.instrument_name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, 1, "Acoustic Grand Piano"),
            (2, 2, "Electric Bass (finger)"),
            (3, 3, "Flute"),
        ]
    );

    let piano = &score.tracks[0];
    assert_eq!(piano.volume, 90);
    assert_eq!(
        piano.events,
        vec![
            event(&[60, 64, 67], 4),
            event(&[65, 69, 72], 4),
            event(&[0], 2),
            event(&[0], 2),
            event(&[0], 2),
            event(&[0], 2),
        ]
    );

    let bass = &score.tracks[1];
    assert_eq!(bass.pitch_shift, -12);
    assert_eq!(
        bass.events,
        vec![
            event(&[60, 64, 67], 4),
            event(&[65, 69, 72], 4),
            event(&[60], 2),
            event(&[60], 2),
            event(&[0], 2),
            event(&[67], 2),
        ]
    );

    let flute = &score.tracks[2];
    assert_eq!(flute.channel, 2);
    assert_eq!(flute.pitch_shift, 12);
    assert_eq!(
        flute.events,
        vec![event(&[60], 1), event(&[62], 1), event(&[64], 1), event(&[65], 1)]
    );
}

#[test]
fn test_unresolved_code_falls_back_to_number() {
    let score = compile("tempo = (1, 1)\ninstrument = +7\n[1] 0\n").unwrap();
    assert_eq!(score.tracks[0].instrument_name, "+7");
    assert_eq!(
        score.warnings,
        vec![Warning::UnresolvedAlias {
            code: "+7".to_string(),
            line: 2
        }]
    );
}

#[test]
fn test_parse_error_aborts_compile() {
    let result = compile("tempo = (1, 1)\ninstrument = a\n[1] 0 }\n");
    match result {
        Err(ScoreError::ParseError {
            line,
            column,
            message,
        }) => {
            assert_eq!((line, column), (3, 7));
            assert_eq!(message, "Expected note, chord, '[' or newline, found '}'");
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_out_of_range_values_are_parse_errors() {
    for source in [
        "tempo = (1, 1)\ninstrument = a\n[1] 9223372036854775807\n",
        "tempo = (1, 1)\ninstrument = a, octave: 9223372036854775807\n[1] 0\n",
    ] {
        assert!(matches!(compile(source), Err(ScoreError::ParseError { .. })));
    }
}

#[test]
fn test_repeated_compiles_are_independent() {
    let source = "tempo = (1, 1)\ninstrument = a\n[1] 0\ninstrument = b\n[1] 0\n";
    let first = compile(source).unwrap();
    let second = compile(source).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.tracks[0].instrument_id, 1);
    assert_eq!(second.tracks[1].track_number, 2);
}

#[test]
fn test_rest_collision_is_real() {
    assert_eq!(Note::Pitch(-60).encode(), Note::Rest.encode());
    let score = compile("tempo = (1, 1)\ninstrument = a\n[1] -60 -\n").unwrap();
    assert_eq!(score.tracks[0].events[0], score.tracks[0].events[1]);
}

#[test]
fn test_compile_file_with_table_file() {
    let dir = tempfile::tempdir().unwrap();
    let score_path = dir.path().join("song.mymidi");
    let table_path = dir.path().join("INSTRUMENTS.txt");
    std::fs::write(&score_path, "tempo = (100, 1)\ninstrument = 0\n[2] 0 -\n").unwrap();
    let mut table_file = std::fs::File::create(&table_path).unwrap();
    writeln!(table_file, "Acoustic Grand Piano: 0").unwrap();

    let table = InstrumentTable::load_or_empty(&table_path);
    let score = compile_file(&score_path, &table).unwrap();
    assert_eq!(score.tracks[0].instrument_name, "Acoustic Grand Piano");

    let missing = compile_file(&dir.path().join("nope.mymidi"), &table);
    assert!(matches!(missing, Err(ScoreError::Io { .. })));
}

#[test]
fn test_perform_walks_scheduled_tracks_in_order() {
    let score = compile("tempo = (2, 3)\ninstrument = a, id: 2\ninstrument = b, id: 1\n[1] 0\ninstrument = c\n[1] 1\n").unwrap();
    let mut transcript = Transcript::new();
    perform(&score, &mut transcript).unwrap();

    let created: Vec<_> = transcript
        .calls()
        .iter()
        .filter_map(|c| match c {
            BackendCall::CreateTrack { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    // id 1 comes after id 2 and is never scheduled; c gets id 2 again and is dropped too
    assert_eq!(created, vec![1]);
    assert_eq!(transcript.calls().first(), Some(&BackendCall::Prepare { track_count: 3 }));
    assert_eq!(transcript.calls()[1], BackendCall::SetTempo { tempo: 6 });
    assert_eq!(transcript.calls().last(), Some(&BackendCall::Play));
}

proptest! {
    #[test]
    fn prop_tempo_is_product(a in -10_000i64..10_000, b in -10_000i64..10_000) {
        let score = compile(&format!("tempo = ({}, {})\ninstrument = a\n[1] 0\n", a, b)).unwrap();
        prop_assert_eq!(score.tempo, a * b);
    }

    #[test]
    fn prop_note_encodes_as_offset_plus_60(offset in -500i64..500, duration in 1i64..1000) {
        let score = compile(&format!("tempo = (1, 1)\ninstrument = a\n[{}] {}\n", duration, offset)).unwrap();
        prop_assert_eq!(&score.tracks[0].events, &vec![event(&[offset + 60], duration)]);
    }

    #[test]
    fn prop_auto_ids_follow_counter(start in 0i64..1000, sections in prop::collection::vec(1usize..4, 1..5)) {
        let mut source = String::from("tempo = (1, 1)\n");
        let mut first = true;
        for count in &sections {
            for _ in 0..*count {
                if first {
                    source.push_str(&format!("instrument = x, id: {}\n", start));
                    first = false;
                } else {
                    source.push_str("instrument = x\n");
                }
            }
            source.push_str("[1] 0\n");
        }
        let score = parse(&source).unwrap();
        let total: usize = sections.iter().sum();
        let expected: Vec<i64> = (0..total as i64).map(|i| start + i).collect();
        prop_assert_eq!(score.instrument_ids, expected);
    }

    #[test]
    fn prop_track_numbers_are_contiguous(sections in prop::collection::vec(1usize..5, 1..6)) {
        let mut source = String::from("tempo = (1, 1)\n");
        for count in &sections {
            for _ in 0..*count {
                source.push_str("instrument = x\n");
            }
            source.push_str("[1] 0\n");
        }
        let score = compile(&source).unwrap();
        let total: usize = sections.iter().sum();
        prop_assert_eq!(score.track_count, total);
        let numbers: Vec<usize> = score.tracks.iter().map(|t| t.track_number).collect();
        prop_assert_eq!(numbers, (1..=total).collect::<Vec<_>>());
        for track in &score.tracks {
            prop_assert_eq!(track.channel, track.track_number - 1);
        }
    }

    #[test]
    fn prop_muted_chord_keeps_note_count(offsets in prop::collection::vec(-24i64..24, 1..8)) {
        let chord: Vec<String> = offsets.iter().map(i64::to_string).collect();
        let source = format!(
            "tempo = (1, 1)\ninstrument = a\ninstrument = b\n<1> [3] {{{}}}\n",
            chord.join(" ")
        );
        let score = compile(&source).unwrap();
        let audible: Vec<i64> = offsets.iter().map(|o| o + 60).collect();
        prop_assert_eq!(&score.tracks[0].events, &vec![event(&audible, 3)]);
        prop_assert_eq!(&score.tracks[1].events, &vec![event(&vec![0; offsets.len()], 3)]);
    }
}
