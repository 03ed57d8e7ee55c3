// tests/combination.rs

mod common;
use crate::common::builders::{demo_axes, echo_action, three_value_axis};
use crate::common::{FakeExecutor, command_log};

use std::collections::HashSet;

use anyhow::anyhow;
use matrix_runner::matrix::{FilterChain, Selection, combine, expand};
use matrix_runner::{Config, Filter, MatrixError, Mode, Runner};

fn runner() -> Runner {
    let mut runner = Runner::with_executor(FakeExecutor::new(command_log()));
    runner
        .add_axes(demo_axes())
        .unwrap()
        .add_action(echo_action("build"))
        .unwrap();
    runner
}

fn all_selections() -> Vec<Selection> {
    demo_axes().iter().map(Selection::all).collect()
}

fn labels(configs: &[Config]) -> Vec<String> {
    configs.iter().map(ToString::to_string).collect()
}

#[test]
fn full_product_enumerates_last_axis_fastest() {
    let configs = combine(&all_selections(), Mode::Full);

    assert_eq!(configs.len(), 27);
    let shown = labels(&configs);
    assert_eq!(shown[0], "alpha=value1, beta=value1, gamma=value1");
    assert_eq!(shown[1], "alpha=value1, beta=value1, gamma=value2");
    assert_eq!(shown[3], "alpha=value1, beta=value2, gamma=value1");
    assert_eq!(shown[26], "alpha=value3, beta=value3, gamma=value3");

    let unique: HashSet<&Config> = configs.iter().collect();
    assert_eq!(unique.len(), 27);
}

#[test]
fn every_config_assigns_every_axis_in_registration_order() {
    for config in combine(&all_selections(), Mode::Pairwise) {
        let axes: Vec<&str> = config.assignments().iter().map(|a| a.axis.as_str()).collect();
        assert_eq!(axes, vec!["alpha", "beta", "gamma"]);
    }
}

#[test]
fn selection_order_is_respected() {
    let runner = runner();
    let args = runner
        .parse_args(["-a", "v3", "-a", "v1", "-b", "v2", "-c", "v2", "build"])
        .unwrap();
    let configs = runner.configs(&args).unwrap();

    assert_eq!(
        labels(&configs),
        vec![
            "alpha=value3, beta=value2, gamma=value2",
            "alpha=value1, beta=value2, gamma=value2",
        ]
    );
}

#[test]
fn pairwise_covers_three_by_three_in_nine() {
    let configs = combine(&all_selections(), Mode::Pairwise);
    assert_eq!(configs.len(), 9);

    let axes = demo_axes();
    for (i, a) in axes.iter().enumerate() {
        for b in &axes[i + 1..] {
            for va in a.values() {
                for vb in b.values() {
                    let covered = configs
                        .iter()
                        .any(|c| c.get(a.name()) == Some(va) && c.get(b.name()) == Some(vb));
                    assert!(covered, "{}={} with {}={} not covered", a.name(), va, b.name(), vb);
                }
            }
        }
    }
}

#[test]
fn pairwise_is_deterministic() {
    let first = labels(&combine(&all_selections(), Mode::Pairwise));
    let second = labels(&combine(&all_selections(), Mode::Pairwise));
    assert_eq!(first, second);
}

#[test]
fn pairwise_with_single_values_is_one_config() {
    let runner = runner();
    let args = runner
        .parse_args(["-2", "-a", "v1", "-b", "v2", "-c", "v3", "build"])
        .unwrap();
    let configs = runner.configs(&args).unwrap();

    assert_eq!(labels(&configs), vec!["alpha=value1, beta=value2, gamma=value3"]);
}

#[test]
fn single_axis_pairwise_lists_each_value_once() {
    let axis = three_value_axis("alpha", 'a');
    let configs = combine(&[Selection::all(&axis)], Mode::Pairwise);
    assert_eq!(
        labels(&configs),
        vec!["alpha=value1", "alpha=value2", "alpha=value3"]
    );
}

#[test]
fn no_axes_is_one_empty_config() {
    let configs = combine(&[], Mode::Full);
    assert_eq!(configs.len(), 1);
    assert!(configs[0].is_empty());
}

#[test]
fn accepting_filter_keeps_matching_configs() {
    let mut chain = FilterChain::new();
    chain.register(Filter::new("alpha-one", |c: &Config| Ok(c.is("alpha", "v1"))));

    let configs = expand(&all_selections(), Mode::Full, &chain).unwrap();
    assert_eq!(configs.len(), 9);
    assert!(configs.iter().all(|c| c.is("alpha", "VALUE1")));
}

#[test]
fn excluding_filter_drops_matching_configs() {
    let mut runner = runner();
    runner.add_filter(Filter::exclude("value3-with-low-beta", |c: &Config| {
        Ok(c.matches("alpha", "value3")? && c.matches("beta", "value[12]")?)
    }));

    let args = runner.parse_args(["build"]).unwrap();
    let configs = runner.configs(&args).unwrap();

    assert_eq!(configs.len(), 21);
    assert!(
        !configs
            .iter()
            .any(|c| c.is("alpha", "value3") && !c.is("beta", "value3"))
    );
}

#[test]
fn filters_combine_with_and_and_keep_order() {
    let mut chain = FilterChain::new();
    chain.register(Filter::exclude("no-v1-alpha", |c: &Config| Ok(c.is("alpha", "v1"))));
    chain.register(Filter::new("gamma-v2", |c: &Config| Ok(c.is("gamma", "v2"))));

    let configs = expand(&all_selections(), Mode::Full, &chain).unwrap();
    assert_eq!(
        labels(&configs),
        vec![
            "alpha=value2, beta=value1, gamma=value2",
            "alpha=value2, beta=value2, gamma=value2",
            "alpha=value2, beta=value3, gamma=value2",
            "alpha=value3, beta=value1, gamma=value2",
            "alpha=value3, beta=value2, gamma=value2",
            "alpha=value3, beta=value3, gamma=value2",
        ]
    );
}

#[test]
fn filters_apply_after_pairwise_generation() {
    let mut chain = FilterChain::new();
    chain.register(Filter::exclude("no-v3-gamma", |c: &Config| Ok(c.is("gamma", "v3"))));

    let generated = combine(&all_selections(), Mode::Pairwise);
    let kept = expand(&all_selections(), Mode::Pairwise, &chain).unwrap();

    let expected: Vec<Config> = generated
        .into_iter()
        .filter(|c| !c.is("gamma", "v3"))
        .collect();
    assert_eq!(kept, expected);
}

#[test]
fn filter_error_is_fatal() {
    let mut chain = FilterChain::new();
    chain.register(Filter::new("broken", |_: &Config| Err(anyhow!("lookup failed"))));

    let err = expand(&all_selections(), Mode::Full, &chain).unwrap_err();
    match err {
        MatrixError::Filter { filter, config, .. } => {
            assert_eq!(filter, "broken");
            assert_eq!(config, "alpha=value1, beta=value1, gamma=value1");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn pattern_matching_is_anchored_and_checks_aliases() {
    let config = &combine(&all_selections(), Mode::Full)[0];

    assert!(config.matches("alpha", "value1").unwrap());
    assert!(config.matches("alpha", "VALUE.").unwrap());
    assert!(config.matches("alpha", "v[12]").unwrap());
    assert!(!config.matches("alpha", "value").unwrap());
    assert!(!config.matches("alpha", "alue1").unwrap());

    assert!(matches!(config.matches("delta", "x"), Err(MatrixError::UnknownAxis(_))));
    assert!(matches!(config.matches("alpha", "("), Err(MatrixError::Pattern { .. })));
}
