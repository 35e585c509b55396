use std::cmp::Reverse;
use std::fmt::{Debug, Display, Formatter};
use instant::{Duration, Instant};
use log::{debug, info, trace};
use crate::consistency::{self, Ac3Failure, ArcPair};
use crate::{is_consistent, Assignment, Crossword, Dictionary, Domains, VariableId, WordId};

/// Knobs for a solving session.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Give up on the search after this long. `None` searches until it either finds a fill or
    /// proves there isn't one.
    pub time_limit: Option<Duration>,
}

/// A struct tracking statistics about the solving process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: u64,
    pub backtracks: u64,
    pub revisions: u64,
    pub removals: u64,
    pub duration: Duration,
}

/// A struct representing the results of a successful solve.
#[derive(Debug)]
pub struct Solution {
    pub assignment: Assignment,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveFailure {
    /// The puzzle can't be filled from the word list.
    NoSolution,
    /// The configured time limit ran out before the search finished.
    TimedOut,
}

impl Display for SolveFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveFailure::NoSolution => write!(f, "no solution"),
            SolveFailure::TimedOut => write!(f, "time limit exceeded"),
        }
    }
}

impl std::error::Error for SolveFailure {}

/// A solving session over one crossword and word list. The session owns the domains; node and arc
/// consistency prune them up front and the search only ever reads them.
pub struct CrosswordSolver<'a> {
    crossword: &'a Crossword,
    dictionary: &'a Dictionary,
    domains: Domains,
    config: SolverConfig,
    statistics: Statistics,
    deadline: Option<Instant>,
}

impl<'a> Debug for CrosswordSolver<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrosswordSolver")
            .field("crossword", &self.crossword)
            .field("dictionary", &self.dictionary)
            .field("config", &self.config)
            .field("statistics", &self.statistics)
            .finish()
    }
}

impl<'a> CrosswordSolver<'a> {
    pub fn new(crossword: &'a Crossword, dictionary: &'a Dictionary) -> CrosswordSolver<'a> {
        CrosswordSolver::with_config(crossword, dictionary, SolverConfig::default())
    }

    /// Create a session with every variable's domain set to the full dictionary.
    pub fn with_config(
        crossword: &'a Crossword,
        dictionary: &'a Dictionary,
        config: SolverConfig,
    ) -> CrosswordSolver<'a> {
        CrosswordSolver {
            crossword,
            dictionary,
            domains: Domains::new(crossword, dictionary),
            config,
            statistics: Statistics::default(),
            deadline: None,
        }
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn enforce_node_consistency(&mut self) {
        self.domains.enforce_node_consistency(self.crossword, self.dictionary);
    }

    /// Run AC-3 over the session's domains; see `consistency::ac3`.
    pub fn ac3(&mut self, arcs: Option<Vec<ArcPair>>) -> Result<(), Ac3Failure> {
        let result = consistency::ac3(self.crossword, self.dictionary, &mut self.domains, arcs);

        if let Ok(counts) = &result {
            self.statistics.revisions += counts.revisions;
            self.statistics.removals += counts.removals;
        }

        result.map(|_| ())
    }

    /// Enforce node and arc consistency, and then search for a complete assignment.
    pub fn solve(mut self) -> Result<Solution, SolveFailure> {
        let assignment = self.run()?;
        Ok(Solution { assignment, statistics: self.statistics })
    }

    /// The body of `solve`, leaving the session in place so its statistics can be read whichever
    /// way it ends. `Statistics::duration` covers the whole run.
    pub fn run(&mut self) -> Result<Assignment, SolveFailure> {
        let start = Instant::now();
        let result = self.run_stages();
        self.statistics.duration = start.elapsed();

        match &result {
            Ok(_) => info!("Found a fill: {:?}", self.statistics),
            Err(failure) => info!("Search failed ({}): {:?}", failure, self.statistics),
        }

        result
    }

    fn run_stages(&mut self) -> Result<Assignment, SolveFailure> {
        self.enforce_node_consistency();

        // A variable with nothing that fits it dooms the puzzle. AC-3 would only notice this if the
        // variable happened to cross something, so check directly.
        if let Some(variable_id) = self.domains.first_empty() {
            info!("No words fit variable {:?}", self.crossword.variable(variable_id));
            return Err(SolveFailure::NoSolution);
        }

        if let Err(Ac3Failure { variable }) = self.ac3(None) {
            info!("Arc consistency left no options for variable {:?}", self.crossword.variable(variable));
            return Err(SolveFailure::NoSolution);
        }

        self.backtrack(Assignment::new())
    }

    /// Using backtracking search, extend the given partial assignment into a complete one. The
    /// time limit, if any, starts over with each call.
    pub fn backtrack(&mut self, mut assignment: Assignment) -> Result<Assignment, SolveFailure> {
        self.deadline = self.config.time_limit.map(|limit| Instant::now() + limit);

        self.backtrack_in_place(&mut assignment)?;
        Ok(assignment)
    }

    /// Each call either leaves `assignment` complete and returns `Ok`, or returns it exactly as it
    /// was passed in.
    fn backtrack_in_place(&mut self, assignment: &mut Assignment) -> Result<(), SolveFailure> {
        let Some(variable_id) = self.select_unassigned_variable(assignment) else {
            return Ok(());
        };

        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(SolveFailure::TimedOut);
            }
        }

        self.statistics.states += 1;
        trace!("State {}: filling variable {} with {} assigned", self.statistics.states, variable_id, assignment.len());

        for word_id in self.order_domain_values(variable_id, assignment) {
            assignment.insert(variable_id, word_id);

            if is_consistent(assignment, self.crossword, self.dictionary) {
                trace!("Trying {} for variable {}", self.dictionary.word(word_id).string, variable_id);

                match self.backtrack_in_place(assignment) {
                    Ok(()) => return Ok(()),
                    Err(SolveFailure::NoSolution) => {}
                    Err(SolveFailure::TimedOut) => {
                        assignment.remove(variable_id);
                        return Err(SolveFailure::TimedOut);
                    }
                }
            }

            assignment.remove(variable_id);
        }

        self.statistics.backtracks += 1;
        debug!("Backtracking from variable {}", variable_id);

        Err(SolveFailure::NoSolution)
    }

    /// Choose the unassigned variable with the fewest remaining options. Ties go to the variable
    /// crossing the most others (assigned or not), and then to the lowest variable id. Returns
    /// `None` once every variable is assigned.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<VariableId> {
        (0..self.crossword.variables().len())
            .filter(|&variable_id| !assignment.contains(variable_id))
            .min_by_key(|&variable_id| {
                (self.domains.len(variable_id), Reverse(self.crossword.degree(variable_id)), variable_id)
            })
    }

    /// Return the words in this variable's domain that fit its length, ordered by how many options
    /// they would rule out for unassigned crossing variables, fewest first. A neighbor's option is
    /// ruled out if it's the same word or if it has a different letter in the shared cell. Ties
    /// keep dictionary order.
    pub fn order_domain_values(&self, variable_id: VariableId, assignment: &Assignment) -> Vec<WordId> {
        let open_crossings: Vec<_> = self.crossword.crossings(variable_id).iter()
            .filter(|crossing| !assignment.contains(crossing.other_variable))
            .collect();

        // Words that don't fit the slot can never be part of a fill.
        let length = self.crossword.variable(variable_id).length;
        let mut values: Vec<WordId> = self.domains.iter(variable_id)
            .filter(|&word_id| self.dictionary.word(word_id).len() == length)
            .collect();

        values.sort_by_cached_key(|&word_id| {
            let word = self.dictionary.word(word_id);

            open_crossings.iter().map(|crossing| {
                let glyph = word.glyphs[crossing.cell];

                self.domains.iter(crossing.other_variable).map(|other_word_id| {
                    let other_glyph = self.dictionary.word(other_word_id).glyphs.get(crossing.other_cell);
                    (other_word_id == word_id || other_glyph != Some(&glyph)) as usize
                }).sum::<usize>()
            }).sum::<usize>()
        });

        values
    }
}
