use good_lp::solvers::coin_cbc::coin_cbc;
use good_lp::solvers::{ResolutionError, SolutionStatus, WithTimeLimit};
use good_lp::{Expression, ProblemVariables, Solution, SolverModel, Variable, variable, variables};
use std::time::Duration;

use crate::candidates::Candidate;
use crate::error::{Error, Result};
use crate::model::PreferenceDataset;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolveOptions {
    /// Wall-clock budget handed to the solver; `None` runs to completion.
    pub time_limit: Option<Duration>,
}

/// Outcome of solving the binary program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedProgram {
    /// Indices into the candidate list whose variable was set to 1.
    pub chosen: Vec<usize>,
    /// Objective value reported by the solver, rounded to an integer.
    pub objective: i64,
}

/// Build the 0/1 program over `candidates` and solve it to optimality.
///
/// `candidates[i]` is decided by the `i`-th variable; the returned indices
/// refer back into `candidates`.
pub fn solve(
    dataset: &PreferenceDataset,
    candidates: &[Candidate],
    options: &SolveOptions,
) -> Result<SolvedProgram> {
    // One binary variable per candidate, addressed by candidate index
    let (variables, candidate_vars) = init_variables(candidates);

    let objective = create_objective_function(candidates, &candidate_vars);
    let model = create_model(variables, objective, options.time_limit);

    let model = constrain_rooms_filled_once(model, dataset, candidates, &candidate_vars);
    let model = constrain_people_placed_once(model, dataset, candidates, &candidate_vars);

    tracing::info!(
        "Solving {} binary variables with {} room and {} person constraints",
        candidate_vars.len(),
        dataset.rooms.len(),
        dataset.people.len()
    );
    let solution = model.solve().map_err(|err| match err {
        ResolutionError::Infeasible => Error::InfeasibleProblem {
            rooms: dataset.rooms.len(),
            people: dataset.people.len(),
        },
        other => Error::Solver(other),
    })?;
    check_optimal(solution.status(), options)?;

    let objective = evaluate_objective(&solution, candidates, &candidate_vars);
    let chosen = chosen_candidates(&solution, &candidate_vars);
    tracing::debug!("Solver chose {} candidates", chosen.len());

    Ok(SolvedProgram { chosen, objective })
}

fn init_variables(candidates: &[Candidate]) -> (ProblemVariables, Vec<Variable>) {
    let mut problem_vars = variables!();
    let candidate_vars = candidates
        .iter()
        .map(|_| problem_vars.add(variable().binary()))
        .collect();
    (problem_vars, candidate_vars)
}

fn create_objective_function(candidates: &[Candidate], candidate_vars: &[Variable]) -> Expression {
    candidates
        .iter()
        .zip(candidate_vars)
        .fold(Expression::from(0.0), |sum, (candidate, &var)| {
            sum + var * (candidate.happiness as f64)
        })
}

/// Create a maximisation model, bounded by `time_limit` when one is given
fn create_model(
    variables: ProblemVariables,
    objective: Expression,
    time_limit: Option<Duration>,
) -> impl SolverModel<Error = ResolutionError> {
    let mut model = variables.maximise(objective).using(coin_cbc);
    #[cfg(not(debug_assertions))]
    model.set_parameter("loglevel", "0");
    if let Some(limit) = time_limit {
        model = model.with_time_limit(limit.as_secs_f64());
    }
    model
}

/// Every room holds exactly one chosen pair (or single)
fn constrain_rooms_filled_once<Model: SolverModel>(
    model: Model,
    dataset: &PreferenceDataset,
    candidates: &[Candidate],
    candidate_vars: &[Variable],
) -> Model {
    dataset.room_ids().fold(model, |m, room| {
        let pairs_in_room = candidates
            .iter()
            .zip(candidate_vars)
            .filter(|(candidate, _)| candidate.room == room)
            .fold(Expression::from(0.0), |sum, (_, &var)| sum + var);
        m.with(pairs_in_room.eq(1.0))
    })
}

/// Every person appears in exactly one chosen candidate, on either side
fn constrain_people_placed_once<Model: SolverModel>(
    model: Model,
    dataset: &PreferenceDataset,
    candidates: &[Candidate],
    candidate_vars: &[Variable],
) -> Model {
    dataset.person_ids().fold(model, |m, person| {
        let placements = candidates
            .iter()
            .zip(candidate_vars)
            .filter(|(candidate, _)| candidate.involves(person))
            .fold(Expression::from(0.0), |sum, (_, &var)| sum + var);
        m.with(placements.eq(1.0))
    })
}

/// Only a proven optimum is accepted; a time-limited incumbent is not.
fn check_optimal(status: SolutionStatus, options: &SolveOptions) -> Result<()> {
    match status {
        SolutionStatus::Optimal => Ok(()),
        SolutionStatus::TimeLimit => Err(Error::SolveTimedOut {
            limit: options.time_limit.unwrap_or_default(),
        }),
        other => Err(Error::NotOptimal {
            status: format!("{other:?}"),
        }),
    }
}

fn evaluate_objective(
    solution: &impl Solution,
    candidates: &[Candidate],
    candidate_vars: &[Variable],
) -> i64 {
    candidates
        .iter()
        .zip(candidate_vars)
        .map(|(candidate, &var)| candidate.happiness as f64 * solution.value(var))
        .sum::<f64>()
        .round() as i64
}

fn chosen_candidates(solution: &impl Solution, candidate_vars: &[Variable]) -> Vec<usize> {
    candidate_vars
        .iter()
        .enumerate()
        .filter_map(|(index, &var)| (solution.value(var).round() as i64 == 1).then_some(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates;
    use crate::model::{Person, PersonId, Room};
    use std::collections::BTreeMap;

    fn dataset(rooms: &[&str], people: &[(&str, &[(&str, i64)])]) -> PreferenceDataset {
        PreferenceDataset::new(
            rooms.iter().map(|r| Room::new(*r)).collect(),
            people
                .iter()
                .map(|(name, prefs)| {
                    Person::new(
                        *name,
                        prefs
                            .iter()
                            .map(|(label, score)| (label.to_string(), *score))
                            .collect::<BTreeMap<_, _>>(),
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn pair_prefers_sharing_when_it_scores_higher() {
        let x: &[(&str, i64)] = &[("A (single)", 0), ("A (double)", 2), ("X", 0), ("Y", 3)];
        let y: &[(&str, i64)] = &[("A (single)", 0), ("A (double)", 1), ("X", 4), ("Y", 0)];
        let dataset = dataset(&["A"], &[("X", x), ("Y", y)]);
        let candidates = candidates::generate(&dataset).unwrap();
        let solved = solve(&dataset, &candidates, &SolveOptions::default()).unwrap();

        assert_eq!(solved.objective, 10);
        assert_eq!(solved.chosen.len(), 1);
        let chosen = candidates[solved.chosen[0]];
        assert_eq!((chosen.first, chosen.second), (PersonId(0), PersonId(1)));
    }

    #[test]
    fn more_rooms_than_people_is_infeasible() {
        let prefs: &[(&str, i64)] = &[
            ("A (single)", 1),
            ("A (double)", 1),
            ("B (single)", 1),
            ("B (double)", 1),
            ("C (single)", 1),
            ("C (double)", 1),
            ("X", 1),
            ("Y", 1),
        ];
        let dataset = dataset(&["A", "B", "C"], &[("X", prefs), ("Y", prefs)]);
        let candidates = candidates::generate(&dataset).unwrap();
        let err = solve(&dataset, &candidates, &SolveOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::InfeasibleProblem {
                rooms: 3,
                people: 2
            }
        ));
    }

    #[test]
    fn time_limited_status_is_not_infeasibility() {
        let options = SolveOptions {
            time_limit: Some(Duration::from_secs(2)),
        };
        let err = check_optimal(SolutionStatus::TimeLimit, &options).unwrap_err();
        assert!(matches!(err, Error::SolveTimedOut { limit } if limit == Duration::from_secs(2)));
        assert!(check_optimal(SolutionStatus::Optimal, &options).is_ok());

        let err = check_optimal(SolutionStatus::GapLimit, &options).unwrap_err();
        assert!(matches!(err, Error::NotOptimal { ref status } if status == "GapLimit"));
    }
}
