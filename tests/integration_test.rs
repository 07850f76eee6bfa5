// Integration tests for careermatch
use careermatch::{
    CareerCatalog, CareerRecord, CatalogHandle, ClusterFilter, DimensionGroup, DimensionSchema, Error, GroupMetric,
    MatchEngine, MatchError, MatchReport, MatchRequest, PsychometricProfile, Ranker, RankerConfig, Scale,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

const CLUSTERS: [&str; 4] = ["business", "creative", "health", "technology"];

fn random_records(seed: u64, count: usize) -> Vec<CareerRecord> {
    let schema = DimensionSchema::standard();
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| CareerRecord {
            occupation_code: format!("{:02}-{:04}.00", 11 + i % 40, i),
            title: format!("Occupation {}", i),
            cluster_label: CLUSTERS[i % CLUSTERS.len()].to_string(),
            raw_profile: schema
                .names()
                .map(|n| (n.to_string(), rng.random_range(1.0..7.0)))
                .collect(),
        })
        .collect()
}

fn random_person(seed: u64) -> PsychometricProfile {
    let schema = DimensionSchema::standard();
    let mut rng = StdRng::seed_from_u64(seed);
    let scores: Vec<(String, f64)> = schema
        .names()
        .map(|n| (n.to_string(), rng.random_range(1.0..7.0)))
        .collect();
    PsychometricProfile::new(&schema, scores).unwrap()
}

fn engine(catalog: CareerCatalog) -> MatchEngine {
    MatchEngine::new(CatalogHandle::new(catalog), Ranker::new(RankerConfig::default()).unwrap())
}

#[test]
fn test_normalization_round_trip() {
    let catalog = CareerCatalog::load(&DimensionSchema::standard(), random_records(11, 20)).unwrap();
    assert_eq!(catalog.stats().degenerate_dimensions().count(), 0);

    for career in &catalog {
        let restored = catalog.stats().denormalize(career.normalized()).unwrap();
        assert_eq!(restored.scale(), Scale::Raw);
        for (original, back) in career.raw().values().iter().zip(restored.values()) {
            assert!((original - back).abs() < 1e-9);
        }
    }
}

#[test]
fn test_ranking_order_and_top_k() {
    let engine = engine(CareerCatalog::load(&DimensionSchema::standard(), random_records(12, 20)).unwrap());
    let request = MatchRequest {
        cluster: ClusterFilter::All,
        top_k: Some(100),
    };

    for seed in 0..5 {
        let outcome = engine.match_person(&random_person(seed), &request).unwrap();
        assert_eq!(outcome.results.len(), 20);
        for pair in outcome.results.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.score > b.score || (a.score == b.score && a.occupation_code < b.occupation_code));
        }
    }
}

#[test]
fn test_self_similarity_is_maximal() {
    let catalog = CareerCatalog::load(&DimensionSchema::standard(), random_records(13, 12)).unwrap();

    for metric in [GroupMetric::Cosine, GroupMetric::Euclidean, GroupMetric::Manhattan] {
        let ranker = Ranker::new(RankerConfig::default().with_metric(metric)).unwrap();
        for career in &catalog {
            let result = ranker.score(career.normalized(), career).unwrap();
            assert!((result.score - 1.0).abs() < 1e-12, "{:?} self score {}", metric, result.score);
            assert!(result.deltas.iter().all(|d| d.delta == 0.0));

            let ranked = ranker.rank(career.normalized(), &catalog, 1).unwrap();
            assert_eq!(ranked[0].occupation_code, career.occupation_code);
        }
    }
}

#[test]
fn test_missing_dimension_never_defaults() {
    let schema = DimensionSchema::standard();
    for skipped in schema.names() {
        let scores: BTreeMap<&str, f64> = schema.names().filter(|n| *n != skipped).map(|n| (n, 3.0)).collect();
        assert_eq!(
            PsychometricProfile::new(&schema, scores).unwrap_err(),
            Error::IncompleteProfile {
                missing: vec![skipped.to_string()]
            }
        );
    }
}

#[test]
fn test_constant_dimension_normalizes_to_zero() {
    let mut records = random_records(14, 10);
    for record in &mut records {
        record.raw_profile.insert("analytical".to_string(), 3.67);
    }
    let catalog = CareerCatalog::load(&DimensionSchema::standard(), records).unwrap();

    assert_eq!(catalog.stats().degenerate_dimensions().collect::<Vec<_>>(), vec!["analytical"]);
    for career in &catalog {
        assert_eq!(career.normalized().get("analytical").unwrap(), 0.0);
    }

    let outcome = engine(catalog)
        .match_person(&random_person(3), &MatchRequest::default())
        .unwrap();
    assert!(outcome.results.iter().all(|r| r.score.is_finite()));
}

#[test]
fn test_small_schema_scenario() {
    let schema = Arc::new(
        DimensionSchema::builder(1)
            .group(DimensionGroup::Traits, ["t1", "t2"])
            .group(DimensionGroup::Interests, ["i1"])
            .build()
            .unwrap(),
    );
    let record = |code: &str, values: [f64; 3]| CareerRecord {
        occupation_code: code.to_string(),
        title: code.to_string(),
        cluster_label: "general".to_string(),
        raw_profile: ["t1", "t2", "i1"]
            .iter()
            .zip(values)
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    };
    let catalog = CareerCatalog::load(&schema, vec![record("A", [1.0, 1.0, 5.0]), record("B", [5.0, 5.0, 5.0])]).unwrap();
    let person = PsychometricProfile::from_values(&schema, vec![1.0, 1.0, 5.0], Scale::Raw).unwrap();

    let outcome = engine(catalog).match_person(&person, &MatchRequest::default()).unwrap();

    let codes: Vec<&str> = outcome.results.iter().map(|r| r.occupation_code.as_str()).collect();
    assert_eq!(codes, vec!["A", "B"]);
    assert!(outcome.results[0].score > outcome.results[1].score);
    assert!(outcome.results[0].deltas.iter().all(|d| d.delta == 0.0));
}

#[test]
fn test_empty_cluster_is_an_error() {
    let engine = engine(CareerCatalog::load(&DimensionSchema::standard(), random_records(15, 8)).unwrap());
    let request = MatchRequest {
        cluster: ClusterFilter::Label("agriculture".to_string()),
        top_k: None,
    };

    let err = engine.match_person(&random_person(1), &request).unwrap_err();
    assert_eq!(
        err,
        MatchError::EmptyCandidateSet {
            cluster: Some("agriculture".to_string())
        }
    );
}

#[test]
fn test_cluster_filters() {
    let engine = engine(CareerCatalog::load(&DimensionSchema::standard(), random_records(16, 20)).unwrap());

    let labelled = engine
        .match_person(
            &random_person(2),
            &MatchRequest {
                cluster: ClusterFilter::Label("health".to_string()),
                top_k: None,
            },
        )
        .unwrap();
    assert_eq!(labelled.candidates_count, 5);
    assert!(labelled.results.iter().all(|r| r.cluster_label == "health"));

    let inferred = engine
        .match_person(
            &random_person(2),
            &MatchRequest {
                cluster: ClusterFilter::Infer,
                top_k: None,
            },
        )
        .unwrap();
    let label = inferred.cluster.clone().unwrap();
    assert!(CLUSTERS.contains(&label.as_str()));
    assert!(inferred.results.iter().all(|r| r.cluster_label == label));
}

#[test]
fn test_report_for_narrative_layer() {
    let engine = engine(CareerCatalog::load(&DimensionSchema::standard(), random_records(17, 20)).unwrap());
    let outcome = engine
        .match_person(
            &random_person(4),
            &MatchRequest {
                cluster: ClusterFilter::All,
                top_k: Some(5),
            },
        )
        .unwrap();

    let report = MatchReport::from_outcome(&outcome, &engine.ranker().config().thresholds);
    assert_eq!(report.stats.candidates_count, 20);
    assert_eq!(report.stats.results_count, 5);
    assert_eq!(report.stats.best_score, report.result[0].score);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["person"].as_object().unwrap().len(), 27);
    assert_eq!(json["result"].as_array().unwrap().len(), 5);
    assert_eq!(json["result"][0]["deltas"].as_array().unwrap().len(), 27);
    assert_eq!(json["result"][0]["explain"].as_object().unwrap().len(), 5);
}

#[test]
fn test_concurrent_matching_with_catalog_swap() {
    let engine = Arc::new(engine(CareerCatalog::load(&DimensionSchema::standard(), random_records(18, 20)).unwrap()));

    let readers: Vec<_> = (0..4u64)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..20 {
                    let outcome = engine
                        .match_person(&random_person(t * 100 + i), &MatchRequest::default())
                        .unwrap();
                    // 20 careers in the first generation, 8 afterwards
                    assert!(outcome.candidates_count == 20 || outcome.candidates_count == 8);
                    assert_eq!(outcome.results.len(), outcome.candidates_count);
                }
            })
        })
        .collect();

    let previous = engine
        .handle()
        .replace(CareerCatalog::load(&DimensionSchema::standard(), random_records(19, 8)).unwrap());
    assert!(engine.handle().current().generation() > previous.generation());

    for reader in readers {
        reader.join().unwrap();
    }
}
