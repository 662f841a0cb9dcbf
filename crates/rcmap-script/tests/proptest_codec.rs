//! Property tests for the map script codec.
//!
//! Random documents are generated from well-formed records of every variant,
//! optionally interleaved with damaged records, and the codec is checked for
//! round-trip stability and per-record fault isolation.

use proptest::prelude::*;
use rcmap_script::prelude::*;

/// Strategy that generates finite f32 values with a short decimal form.
fn finite_f32() -> impl Strategy<Value = f32> {
    (-1_000_000i32..1_000_000i32).prop_map(|v| v as f32 * 0.01)
}

fn vec3_text() -> impl Strategy<Value = String> {
    (finite_f32(), finite_f32(), finite_f32()).prop_map(|(x, y, z)| format!("{x},{y},{z}"))
}

fn transform_text() -> impl Strategy<Value = String> {
    (vec3_text(), finite_f32(), finite_f32(), finite_f32(), finite_f32())
        .prop_map(|(p, x, y, z, w)| format!("{p},{x},{y},{z},{w}"))
}

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// One valid record of any variant.
fn record_text() -> impl Strategy<Value = String> {
    prop_oneof![
        (name(), transform_text()).prop_map(|(n, t)| format!("base,b{n},{t};")),
        (name(), transform_text()).prop_map(|(n, t)| format!("spawnpoint,p{n},{t};")),
        (name(), finite_f32(), any::<bool>(), transform_text()).prop_map(|(n, timer, endless, t)| {
            format!("photon,spawn{n},{timer},{},{t};", u8::from(endless))
        }),
        (name(), name(), vec3_text(), transform_text())
            .prop_map(|(n, region, s, t)| format!("misc,region{n},{region},{s},{t};")),
        (
            name(),
            vec3_text(),
            any::<bool>(),
            vec3_text(),
            finite_f32(),
            finite_f32(),
            transform_text()
        )
            .prop_map(|(material, s, enabled, rgb, u, v, t)| {
                format!(
                    "custom,cuboid,{material},{s},{},{rgb},{u},{v},{t};",
                    u8::from(enabled)
                )
            }),
        (prop_oneof![Just("racing"), Just("misc")], name(), vec3_text(), transform_text())
            .prop_map(|(category, n, s, t)| format!("{category},x{n},{s},{t};")),
    ]
}

/// A record that can never parse.
fn damaged_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("base,short,1,2;".to_owned()),
        Just("bogus,thing,0,0,0,0,0,0,1;".to_owned()),
        Just("base,x,0,0,zero,0,0,0,1;".to_owned()),
        Just("racing,start,0,0,0,0,0,0,1;".to_owned()),
    ]
}

#[derive(Debug, Clone)]
enum Entry {
    Good(String),
    Bad(String),
}

fn entry() -> impl Strategy<Value = Entry> {
    prop_oneof![
        4 => record_text().prop_map(Entry::Good),
        1 => damaged_text().prop_map(Entry::Bad),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn valid_documents_round_trip(
        bounds in any::<bool>(),
        records in prop::collection::vec(record_text(), 0..30),
    ) {
        let mut doc = String::new();
        if bounds {
            doc.push_str(DISABLE_BOUNDS_DIRECTIVE);
        }
        for record in &records {
            doc.push_str(record);
        }

        let assets = AssetCatalog::permissive();
        let codec = MapCodec::new(&assets);
        let parsed = codec.parse(&doc);
        prop_assert!(parsed.is_clean(), "{:?}", parsed.diagnostics);
        prop_assert_eq!(parsed.document.len(), records.len());
        prop_assert_eq!(parsed.document.bounds_disabled, bounds);

        let text = parsed.document.to_string();
        let reparsed = codec.parse(&text);
        prop_assert_eq!(&reparsed.document, &parsed.document);
        prop_assert_eq!(reparsed.document.to_string(), text);
    }

    #[test]
    fn damaged_records_are_isolated(entries in prop::collection::vec(entry(), 1..40)) {
        let doc: String = entries
            .iter()
            .map(|e| match e {
                Entry::Good(text) | Entry::Bad(text) => text.as_str(),
            })
            .collect();

        let assets = AssetCatalog::permissive();
        let parsed = MapCodec::new(&assets).log_skipped(false).parse(&doc);

        let bad_lines: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, Entry::Bad(_)))
            .map(|(i, _)| i)
            .collect();
        let diagnostic_lines: Vec<usize> = parsed.diagnostics.iter().map(|d| d.line).collect();
        prop_assert_eq!(diagnostic_lines, bad_lines);
        prop_assert_eq!(
            parsed.document.len(),
            entries.len() - parsed.diagnostics.len()
        );

        // Surviving records are exactly the good ones, in order.
        let good_only: String = entries
            .iter()
            .filter_map(|e| match e {
                Entry::Good(text) => Some(text.as_str()),
                Entry::Bad(_) => None,
            })
            .collect();
        let clean = MapCodec::new(&assets).parse(&good_only);
        prop_assert_eq!(parsed.document, clean.document);
    }

    #[test]
    fn whitespace_is_insignificant(records in prop::collection::vec(record_text(), 1..10)) {
        let compact: String = records.concat();
        let spaced: String = records
            .iter()
            .map(|r| r.replace(',', " ,\t").replace(';', ";\r\n\n"))
            .collect();

        let assets = AssetCatalog::permissive();
        let codec = MapCodec::new(&assets);
        prop_assert_eq!(codec.parse(&spaced).document, codec.parse(&compact).document);
    }
}
