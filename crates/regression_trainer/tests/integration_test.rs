//! Integration tests for the multiple regression predictor
//!
//! Train from CSV files on disk, persist, revive and query.

use anyhow::Result;
use bdbcontrib_regression_core::{
    gaussian, ConditionError, Conditions, FittedState, ModelChoice, PredictorError, TrainerConfig,
    Value,
};
use bdbcontrib_regression_trainer::{
    train, train_from_csv, Dataset, PredictorRegistry, MULTIPLE_REGRESSION,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use tempfile::NamedTempFile;

const TOKENS: [&str; 2] = ["", "NaN"];

const TARGETS: [(&str, &str); 1] = [("apogee", "numerical")];
const CONDITIONS: [(&str, &str); 3] = [
    ("period", "numerical"),
    ("perigee", "Numerical"),
    ("orbit", "CATEGORICAL"),
];

/// Small satellites table; one missing target and one missing period.
fn create_satellites_csv() -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "name,apogee,period,perigee,orbit")?;
    writeln!(file, "s1,700,98.5,690,LEO")?;
    writeln!(file, "s2,35790,1436.1,35780,GEO")?;
    writeln!(file, "s3,820,101.0,800,LEO")?;
    writeln!(file, "s4,,1436.0,35770,GEO")?;
    writeln!(file, "s5,20200,718.0,20180,MEO")?;
    writeln!(file, "s6,35800,,35790,GEO")?;
    writeln!(file, "s7,560,95.6,540,LEO")?;
    writeln!(file, "s8,20180,717.9,20170,MEO")?;
    file.flush()?;
    Ok(file)
}

fn given(period: f64, perigee: f64, orbit: &str) -> Conditions {
    let mut c = Conditions::new();
    c.insert("period".to_string(), Value::Number(period));
    c.insert("perigee".to_string(), Value::Number(perigee));
    c.insert("orbit".to_string(), Value::from(orbit));
    c
}

fn trained() -> Result<FittedState> {
    let file = create_satellites_csv()?;
    let dataset = Dataset::from_csv(file.path(), &TOKENS)?;
    Ok(train(&dataset, &TARGETS, &CONDITIONS)?)
}

#[test]
fn test_unseen_category_uses_partial_model() -> Result<()> {
    let state = trained()?;
    let orbits: Vec<Option<&str>> = state
        .lookup("orbit")
        .map(|l| l.labels().collect())
        .unwrap_or_default();
    assert_eq!(orbits, [Some("LEO"), Some("GEO"), Some("MEO")]);

    let dist = state.predict_distribution(&given(300.0, 5000.0, "HEO"))?;
    assert_eq!(dist.model, ModelChoice::Partial);
    let direct = state.partial().model.predict(&[300.0, 5000.0])?;
    assert_eq!(dist.mean.to_bits(), direct.to_bits());
    assert_eq!(dist.scale.to_bits(), state.partial().noise.to_bits());

    // No orbit was missing in training, so a missing orbit is unseen too
    let mut c = given(300.0, 5000.0, "LEO");
    c.insert("orbit".to_string(), Value::Missing);
    assert_eq!(state.predict_distribution(&c)?.model, ModelChoice::Partial);
    Ok(())
}

#[test]
fn test_known_category_uses_full_model() -> Result<()> {
    let state = trained()?;
    let dist = state.predict_distribution(&given(718.0, 20180.0, "MEO"))?;
    assert_eq!(dist.model, ModelChoice::Full);

    let direct = state.full().model.predict(&[718.0, 20180.0, 0.0, 0.0, 1.0])?;
    assert_eq!(dist.mean.to_bits(), direct.to_bits());
    assert_eq!(dist.scale.to_bits(), state.full().noise.to_bits());
    Ok(())
}

#[test]
fn test_round_trip_through_file() -> Result<()> {
    let state = trained()?;
    let mut model_file = NamedTempFile::new()?;
    model_file.write_all(&state.serialize()?)?;
    model_file.flush()?;

    let revived = FittedState::deserialize(&std::fs::read(model_file.path())?)?;
    assert_eq!(revived, state);
    assert_eq!(revived.hash_hex()?, state.hash_hex()?);

    for c in [
        given(98.5, 690.0, "LEO"),
        given(1436.1, 35780.0, "GEO"),
        given(400.0, 9000.0, "HEO"),
    ] {
        let a = state.predict_distribution(&c)?;
        let b = revived.predict_distribution(&c)?;
        assert_eq!(a.mean.to_bits(), b.mean.to_bits());
        assert_eq!(a.scale.to_bits(), b.scale.to_bits());
        assert_eq!(a.model, b.model);
    }
    Ok(())
}

#[test]
fn test_density_at_mean() -> Result<()> {
    let state = trained()?;
    let c = given(400.0, 9000.0, "HEO");
    let dist = state.predict_distribution(&c)?;
    let expected = -dist.scale.ln() - gaussian::half_ln_2pi();
    assert_eq!(state.logpdf(dist.mean, &c)?, expected);
    Ok(())
}

#[test]
fn test_missing_numeric_is_mean_imputed() -> Result<()> {
    let mut with_gap = NamedTempFile::new()?;
    writeln!(with_gap, "y,x,z")?;
    writeln!(with_gap, "1.0,1.0,0.5")?;
    writeln!(with_gap, "2.5,NaN,1.5")?;
    writeln!(with_gap, "2.9,3.0,1.0")?;
    writeln!(with_gap, "4.4,5.0,2.0")?;
    with_gap.flush()?;

    // Same table with the gap filled by hand with mean(1, 3, 5)
    let mut filled = NamedTempFile::new()?;
    writeln!(filled, "y,x,z")?;
    writeln!(filled, "1.0,1.0,0.5")?;
    writeln!(filled, "2.5,3.0,1.5")?;
    writeln!(filled, "2.9,3.0,1.0")?;
    writeln!(filled, "4.4,5.0,2.0")?;
    filled.flush()?;

    let conditions = [("x", "numerical"), ("z", "numerical")];
    let targets = [("y", "numerical")];
    let a = train_from_csv(with_gap.path(), &targets, &conditions, TrainerConfig::default())?;
    let b = train_from_csv(filled.path(), &targets, &conditions, TrainerConfig::default())?;

    assert_eq!(a.partial().model, b.partial().model);
    assert_eq!(a.partial().noise.to_bits(), b.partial().noise.to_bits());
    Ok(())
}

#[test]
fn test_incomplete_conditions_name_the_column() -> Result<()> {
    let state = trained()?;
    let mut c = given(98.5, 690.0, "LEO");
    c.remove("perigee");

    let err = state.predict_distribution(&c).unwrap_err();
    match err {
        PredictorError::Condition(ConditionError::Incomplete { missing }) => {
            assert_eq!(missing, vec!["perigee".to_string()]);
        }
        other => panic!("expected incomplete conditions, got {other}"),
    }

    let mut rng = StdRng::seed_from_u64(1);
    assert!(state.simulate(&c, 3, &mut rng).is_err());
    assert!(state.logpdf(700.0, &c).is_err());
    Ok(())
}

#[test]
fn test_registry_persists_and_revives() -> Result<()> {
    let file = create_satellites_csv()?;
    let dataset = Dataset::from_csv(file.path(), &TOKENS)?;
    let registry = PredictorRegistry::with_defaults();

    let predictor = registry.create(MULTIPLE_REGRESSION, &dataset, &TARGETS, &CONDITIONS)?;
    let bytes = predictor.serialize()?;
    let revived = registry.deserialize(MULTIPLE_REGRESSION, &bytes)?;

    let c = given(718.0, 20180.0, "MEO");
    let mut rng_a = StdRng::seed_from_u64(42);
    let mut rng_b = StdRng::seed_from_u64(42);
    let a = predictor.simulate(4, &c, &mut rng_a)?;
    let b = revived.simulate(4, &c, &mut rng_b)?;
    assert_eq!(a, b);
    assert_eq!(a.len(), 4);
    Ok(())
}
