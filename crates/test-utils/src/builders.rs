use matrix_runner::{Action, Axis, AxisValue, Command, Config, Runner, Sequence, Step, steps};

/// Axis with values `VALUE1..VALUE3`, aliased `value1`/`v1` and so on.
pub fn three_value_axis(name: &str, abbrev: char) -> Axis {
    Axis::new(
        name,
        abbrev,
        format!("the {name} axis"),
        (1..=3).map(|i| AxisValue::new(format!("VALUE{i}"), [format!("value{i}"), format!("v{i}")])),
    )
}

/// Boolean axis: `NEGATIVE` (`False`, `0`) and `POSITIVE` (`True`, `1`).
pub fn bool_axis(name: &str, abbrev: char) -> Axis {
    use matrix_runner::model::Token;
    Axis::new(
        name,
        abbrev,
        format!("the {name} switch"),
        [
            AxisValue::new("NEGATIVE", [Token::Bool(false), Token::Int(0)]),
            AxisValue::new("POSITIVE", [Token::Bool(true), Token::Int(1)]),
        ],
    )
}

/// Action yielding one `echo <action> <config>` command per config.
pub fn echo_action(name: &str) -> Action {
    let label = name.to_string();
    Action::from_fn(name, format!("echo for {name}"), move |config: &Config| {
        Sequence::new([Command::new(config, ["echo".to_string(), label.clone(), config.to_string()])])
    })
}

/// Action that only acts when `axis` is set to `value`.
pub fn guarded_action(name: &str, axis: &str, value: &str) -> Action {
    let (axis, value) = (axis.to_string(), value.to_string());
    Action::from_fn(name, "guarded", move |config: &Config| {
        if config.is(&axis, &value) {
            Sequence::new([Command::new(config, ["guarded"])])
        } else {
            Sequence::empty()
        }
    })
}

/// Action running `first`, then `second` only when `first` exited with
/// `expected`.
pub fn conditional_action(name: &str, expected: i32) -> Action {
    Action::from_fn(name, "two-step", move |config: &Config| {
        let config = config.clone();
        steps(move |results| {
            Ok(match results.len() {
                0 => Step::Run(Command::new(&config, ["first"])),
                1 if results[0].exit_code == expected => {
                    Step::Run(Command::new(&config, ["second"]))
                }
                _ => Step::Done,
            })
        })
    })
}

/// The three-axis demo matrix (`alpha`/`beta`/`gamma`, three values each).
pub fn demo_axes() -> Vec<Axis> {
    vec![
        three_value_axis("alpha", 'a'),
        three_value_axis("beta", 'b'),
        three_value_axis("gamma", 'c'),
    ]
}

/// Runner over [`demo_axes`] using `executor`, with `actions` registered.
pub fn demo_runner<E>(executor: E, actions: Vec<Action>) -> Runner
where
    E: matrix_runner::Executor + 'static,
{
    let mut runner = Runner::with_executor(executor);
    runner
        .add_axes(demo_axes())
        .expect("demo axes register")
        .add_actions(actions)
        .expect("demo actions register");
    runner
}
