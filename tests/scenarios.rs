//! End to end searches through the public API.

use approx::assert_relative_eq;
use resistor_search::format::{parse_threshold, parse_value};
use resistor_search::{search, Error, RValue, SearchConfig, SeriesId, Topology, E24, E96};

fn values(set: &resistor_search::RSet) -> Vec<f64> {
    set.values().iter().map(RValue::value).collect()
}

#[test]
fn parallel_150_in_e24() {
    let cfg = SearchConfig::default();
    let res = cfg.parallel_pair(150.0).unwrap();

    assert!(res.exact_in_series());
    assert_eq!(values(&res.best().set), vec![160.0, 2400.0]);
    assert_eq!(res.best().error, 0.0);
    assert!(res.matches().iter().all(|m| m.error == 0.0));
}

#[test]
fn combination_from_cli_style_input() {
    let cfg = SearchConfig::new(SeriesId::E24, parse_threshold("1%").unwrap()).unwrap();
    let target = parse_value("12.34k").unwrap();
    let (par, ser) = cfg.combination(target).unwrap();

    assert_eq!(par.topology(), Topology::Parallel);
    assert_eq!(ser.topology(), Topology::Series);
    for res in [&par, &ser].iter() {
        assert!(!res.exact_in_series());
        assert!(res.best().error <= 0.01);
        assert!(res.matches().iter().all(|m| m.error <= 0.01));
    }

    let best = &ser.best().set;
    assert_relative_eq!(values(best).iter().sum::<f64>(), target, max_relative = 0.01);
}

#[test]
fn ratio_two_in_e24() {
    let res = search::ratio_pair(2.0, &E24, 0.05).unwrap();
    let best = res.best();

    assert_relative_eq!(
        best.set.r(1).value() / best.set.r(2).value(),
        2.0,
        max_relative = 1e-12
    );
    for m in res.matches() {
        assert!(m.set.r(2).value() <= search::VALUE_CEILING);
        assert!(m.set.r(2).value() >= search::VALUE_FLOOR);
    }
}

#[test]
fn dac_ladder_in_e24() {
    let weights = [1.0, 2.0, 4.0, 8.0, 16.0];
    let res = search::weighted_set(&weights, &E24, 0.03).unwrap();
    let best = res.best();

    assert_eq!(best.set.len(), 5);
    let ratios: Vec<f64> = best
        .set
        .values()
        .iter()
        .zip(weights.iter())
        .map(|(v, w)| v.value() / w)
        .collect();
    let max = ratios.iter().cloned().fold(0.0, f64::max);
    let min = ratios.iter().cloned().fold(f64::INFINITY, f64::min);
    assert_relative_eq!(max / min - 1.0, best.error, max_relative = 1e-12);

    // the smallest resistor never starts below 1k, and the sweep stops once it reaches 10k
    for m in res.matches() {
        let lowest = m.set.values()[0].value();
        assert!(lowest >= search::VALUE_FLOOR);
        assert!(lowest <= search::VALUE_CEILING * 1.1);
    }
}

#[test]
fn fine_series_beat_coarse_ones() {
    let coarse = SearchConfig::for_series(SeriesId::E6)
        .parallel_pair(12_340.0)
        .unwrap();
    let fine = SearchConfig::for_series(SeriesId::E96)
        .parallel_pair(12_340.0)
        .unwrap();
    assert!(fine.best().error <= coarse.best().error);
    assert!(std::ptr::eq(fine.best().set.r(1).series(), &*E96));
}

#[test]
fn rejects_bad_input() {
    let cfg = SearchConfig::default();
    assert_eq!(cfg.parallel_pair(-150.0).unwrap_err(), Error::NonPositive(-150.0));
    assert_eq!(cfg.weighted_set(&[]).unwrap_err(), Error::EmptyWeights);
    assert_eq!(
        SearchConfig::new(SeriesId::E24, 0.5).unwrap_err(),
        Error::ThresholdOutOfRange(0.5)
    );
    assert!(parse_value("12.34k56").is_err());
}
