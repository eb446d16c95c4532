//! Integration Tests for Feature Assembly
//!
//! Layout, defaults and assembler working together on client-shaped records.

#[cfg(test)]
mod integration_tests {
    use serde_json::{json, Map, Value};

    use crate::logic::features::{
        layout::feature_index, DefaultTable, FeatureAssembler, FeatureSlot, FEATURE_COUNT,
        FEATURE_LAYOUT,
    };

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("test record must be an object, got {}", other),
        }
    }

    /// Empty record gives defaults plus missing markers for undefaulted slots
    #[test]
    fn test_empty_record_is_default_vector() {
        let assembler = FeatureAssembler::default();
        let vector = assembler.assemble(&Map::new());

        assert_eq!(vector.len(), FEATURE_COUNT);
        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            let expected = FeatureSlot::from_default(assembler.defaults().get(i));
            assert_eq!(vector.get(i), Some(&expected), "slot {}", name);
        }
        assert_eq!(
            vector.missing_features(),
            assembler.defaults().undefaulted_features()
        );
    }

    /// Only overridden slots differ from the default vector
    #[test]
    fn test_override_age_and_weight() {
        let assembler = FeatureAssembler::default();
        let baseline = assembler.default_vector();
        let vector = assembler.assemble(&record(json!({"Age": 45, "Weight": 80})));

        let age = feature_index("Age").unwrap();
        let weight = feature_index("Weight").unwrap();

        for i in 0..FEATURE_COUNT {
            if i == age {
                assert_eq!(vector.get(i), Some(&FeatureSlot::Number(45.0)));
            } else if i == weight {
                assert_eq!(vector.get(i), Some(&FeatureSlot::Number(80.0)));
            } else {
                assert_eq!(vector.get(i), baseline.get(i));
            }
        }
    }

    /// Client value wins over every default
    #[test]
    fn test_override_precedence_for_every_default() {
        let assembler = FeatureAssembler::default();
        let overrides: Map<String, Value> = assembler
            .defaults()
            .to_named()
            .into_iter()
            .map(|entry| (entry.name.to_string(), json!(entry.value + 1.0)))
            .collect();

        let vector = assembler.assemble(&overrides);
        for entry in assembler.defaults().to_named() {
            assert_eq!(
                vector.get_by_name(entry.name),
                Some(&FeatureSlot::Number(entry.value + 1.0)),
                "{}",
                entry.name
            );
        }
    }

    /// Key order in the record does not change the vector
    #[test]
    fn test_ordering_independent_of_input_order() {
        let assembler = FeatureAssembler::default();

        let mut forward = Map::new();
        let mut backward = Map::new();
        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            forward.insert(name.to_string(), json!(i as f64 * 0.5));
        }
        for (i, name) in FEATURE_LAYOUT.iter().enumerate().rev() {
            backward.insert(name.to_string(), json!(i as f64 * 0.5));
        }

        let a = assembler.assemble(&forward);
        let b = assembler.assemble(&backward);
        assert_eq!(a, b);

        let input = a.to_model_input().unwrap();
        assert_eq!(input.len(), FEATURE_COUNT);
        for (i, value) in input.iter().enumerate() {
            assert_eq!(*value, i as f32 * 0.5);
        }
    }

    /// Unknown keys neither fail nor leak into the vector
    #[test]
    fn test_unknown_keys_ignored() {
        let assembler = FeatureAssembler::default();
        let with_unknown = assembler.assemble(&record(json!({"Foo": 1, "age": 99})));

        assert_eq!(with_unknown, assembler.assemble(&Map::new()));
        assert_eq!(with_unknown.len(), FEATURE_COUNT);
    }

    /// Unknown key alongside explicit defaults behaves like the empty record
    #[test]
    fn test_unknown_key_with_all_defaults() {
        let assembler = FeatureAssembler::default();
        let mut map: Map<String, Value> = assembler
            .defaults()
            .to_named()
            .into_iter()
            .map(|entry| (entry.name.to_string(), json!(entry.value)))
            .collect();
        map.insert("Foo".to_string(), json!(1));

        assert_eq!(assembler.assemble(&map), assembler.assemble(&Map::new()));
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let assembler = FeatureAssembler::default();
        let input = record(json!({"BMI": 27.3, "Gender": 0, "Zinc (mg)": "lots"}));

        assert_eq!(assembler.assemble(&input), assembler.assemble(&input));
    }

    /// Wrong-typed values are tagged, not rejected, by the assembler
    #[test]
    fn test_non_numeric_values_are_tagged() {
        let assembler = FeatureAssembler::default();
        let vector = assembler.assemble(&record(json!({"Age": "forty", "BMI": null})));

        assert!(matches!(
            vector.get_by_name("Age"),
            Some(FeatureSlot::NonNumeric(_))
        ));
        assert_eq!(vector.get_by_name("BMI"), Some(&FeatureSlot::Missing));
        assert!(vector.to_model_input().is_err());
    }

    /// Null over a defaulted slot clears it to the missing marker
    #[test]
    fn test_null_overrides_default() {
        let assembler = FeatureAssembler::default();
        let vector = assembler.assemble(&record(json!({"Age": null})));
        assert_eq!(vector.get_by_name("Age"), Some(&FeatureSlot::Missing));
    }

    /// Every slot filled by the client leaves nothing missing
    #[test]
    fn test_complete_record_has_no_missing() {
        let assembler = FeatureAssembler::new(DefaultTable::empty());
        let full: Map<String, Value> = FEATURE_LAYOUT
            .iter()
            .map(|name| (name.to_string(), json!(1)))
            .collect();

        let vector = assembler.assemble(&full);
        assert!(vector.missing_features().is_empty());
        assert!(vector.to_model_input().unwrap().iter().all(|v| *v == 1.0));
    }
}
