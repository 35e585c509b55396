use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::Path;
use log::{debug, info};
use smallvec::SmallVec;
use crate::{Assignment, Dictionary, GridCoord, PuzzleError, VariableId, MAX_SLOT_LENGTH};

/// The glyph that marks a blocked cell in a structure file unless the caller picks another one.
pub const DEFAULT_BLOCKED_GLYPH: char = '#';

/// Glyph used for blocked cells when rendering a grid.
const RENDERED_BLOCK: char = '█';

/// Direction that a variable is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Across,
    Down,
}

/// A single word slot in the grid. The derived ordering (row, then column, then direction, then
/// length) is the order variables are stored in, so it doubles as the final tie-break whenever
/// the solver has to pick between otherwise equal variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    /// The grid coords of the cell at the given offset into this variable's word.
    pub fn cell(&self, offset: usize) -> GridCoord {
        match self.direction {
            Direction::Across => (self.row, self.col + offset),
            Direction::Down => (self.row + offset, self.col),
        }
    }

    /// Generate the coords for each cell of this variable, in word order.
    pub fn cells(&self) -> impl Iterator<Item=GridCoord> + '_ {
        (0..self.length).map(move |offset| self.cell(offset))
    }
}

/// A crossing between one variable and another, referencing the other variable's id and the
/// location of the shared cell within each of the two words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_variable: VariableId,
    pub cell: usize,
    pub other_cell: usize,
}

/// The immutable description of a puzzle: which cells are fillable, the variables, and the
/// overlaps between them.
pub struct Crossword {
    height: usize,
    width: usize,
    fillable: Vec<Vec<bool>>,
    variables: Vec<Variable>,
    crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>>,
    overlaps: HashMap<(VariableId, VariableId), (usize, usize)>,
}

impl Debug for Crossword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crossword")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("variables", &self.variables)
            .field("overlaps", &(["(", &(self.overlaps.len() / 2).to_string(), " crossings)"].join("")))
            .finish()
    }
}

/// Find every horizontal run of at least two fillable cells, returning its start and length.
fn build_runs(fillable: &[Vec<bool>]) -> Vec<(GridCoord, usize)> {
    let mut result: Vec<(GridCoord, usize)> = vec![];

    for (row, line) in fillable.iter().enumerate() {
        let mut run_start: Option<usize> = None;

        for (col, &cell) in line.iter().enumerate() {
            if cell {
                run_start.get_or_insert(col);
            } else if let Some(start) = run_start.take() {
                if col - start > 1 {
                    result.push(((row, start), col - start));
                }
            }
        }

        if let Some(start) = run_start {
            if line.len() - start > 1 {
                result.push(((row, start), line.len() - start));
            }
        }
    }

    result
}

impl Crossword {
    /// Build a crossword from a structure description: one line per row, where `blocked` marks a
    /// blocked cell and any other character marks a fillable one. Trailing whitespace on a row is
    /// not part of the grid; rows shorter than the longest row are padded with blocked cells.
    pub fn from_structure(structure: &str, blocked: char) -> Result<Crossword, PuzzleError> {
        let mut lines: Vec<&str> = structure.lines().map(str::trim_end).collect();
        while lines.last().map(|line| line.is_empty()).unwrap_or(false) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(PuzzleError::EmptyStructure);
        }

        let height = lines.len();
        let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);

        let fillable: Vec<Vec<bool>> = lines.iter().map(|line| {
            let mut row: Vec<bool> = line.chars().map(|c| c != blocked).collect();
            row.resize(width, false);
            row
        }).collect();

        Ok(Crossword::from_cells(fillable))
    }

    /// Read a structure file; see `from_structure`.
    pub fn load<P: AsRef<Path>>(path: P, blocked: char) -> Result<Crossword, PuzzleError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|source| PuzzleError::Io { path: path.to_path_buf(), source })?;

        let crossword = Crossword::from_structure(&contents, blocked)?;
        info!(
            "Loaded {}x{} structure from {} with {} variables",
            crossword.height, crossword.width, path.display(), crossword.variables.len(),
        );

        Ok(crossword)
    }

    /// Build a crossword from a rectangular grid of fillable flags.
    fn from_cells(fillable: Vec<Vec<bool>>) -> Crossword {
        let height = fillable.len();
        let width = fillable.first().map(|row| row.len()).unwrap_or(0);

        let mut variables: Vec<Variable> = build_runs(&fillable).into_iter()
            .map(|((row, col), length)| Variable { row, col, direction: Direction::Across, length })
            .collect();

        let transposed: Vec<Vec<bool>> =
            (0..width).map(|col| {
                (0..height).map(|row| fillable[row][col]).collect()
            }).collect();

        variables.extend(build_runs(&transposed).into_iter()
            .map(|((col, row), length)| Variable { row, col, direction: Direction::Down, length }));

        variables.sort();

        // Map each cell to the (variable, offset) pairs that cover it; any cell with two entries is
        // a crossing.
        let mut entries_by_cell: HashMap<GridCoord, SmallVec<[(VariableId, usize); 2]>> = HashMap::new();
        for (variable_id, variable) in variables.iter().enumerate() {
            for (offset, cell) in variable.cells().enumerate() {
                entries_by_cell.entry(cell).or_default().push((variable_id, offset));
            }
        }

        let mut crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>> =
            variables.iter().map(|_| SmallVec::new()).collect();
        let mut overlaps: HashMap<(VariableId, VariableId), (usize, usize)> = HashMap::new();

        for entries in entries_by_cell.values() {
            // A cell belongs to at most one across run and one down run.
            if let [(x, x_cell), (y, y_cell)] = entries[..] {
                crossings[x].push(Crossing { other_variable: y, cell: x_cell, other_cell: y_cell });
                crossings[y].push(Crossing { other_variable: x, cell: y_cell, other_cell: x_cell });
                overlaps.insert((x, y), (x_cell, y_cell));
                overlaps.insert((y, x), (y_cell, x_cell));
            }
        }

        for variable_crossings in &mut crossings {
            variable_crossings.sort_by_key(|crossing| crossing.other_variable);
        }

        debug!("Built {} variables with {} crossings", variables.len(), overlaps.len() / 2);

        Crossword { height, width, fillable, variables, crossings, overlaps }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_fillable(&self, (row, col): GridCoord) -> bool {
        self.fillable.get(row).and_then(|line| line.get(col)).copied().unwrap_or(false)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, variable_id: VariableId) -> &Variable {
        &self.variables[variable_id]
    }

    pub fn variable_id(&self, variable: &Variable) -> Option<VariableId> {
        self.variables.binary_search(variable).ok()
    }

    /// The offsets of the shared cell within `x` and `y` respectively, or `None` if the two
    /// variables don't cross.
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<(usize, usize)> {
        self.overlaps.get(&(x, y)).copied()
    }

    /// The crossings of this variable, ordered by the other variable's id.
    pub fn crossings(&self, variable_id: VariableId) -> &[Crossing] {
        &self.crossings[variable_id]
    }

    /// Every variable that crosses this one, in id order.
    pub fn neighbors(&self, variable_id: VariableId) -> impl Iterator<Item=VariableId> + '_ {
        self.crossings[variable_id].iter().map(|crossing| crossing.other_variable)
    }

    /// How many variables cross this one.
    pub fn degree(&self, variable_id: VariableId) -> usize {
        self.crossings[variable_id].len()
    }

    /// Lay the assigned words out on the grid. Cells no assigned word covers are `None`.
    pub fn letter_grid(&self, assignment: &Assignment, dictionary: &Dictionary) -> Vec<Vec<Option<char>>> {
        let mut letters: Vec<Vec<Option<char>>> = vec![vec![None; self.width]; self.height];

        for (variable_id, word_id) in assignment.iter() {
            let variable = &self.variables[variable_id];
            let word = dictionary.word(word_id);

            for ((row, col), &glyph) in variable.cells().zip(word.glyphs.iter()) {
                letters[row][col] = Some(glyph);
            }
        }

        letters
    }

    /// Turn the given assignment into a rendered string, drawing blocked cells as solid blocks and
    /// unfilled cells as spaces.
    pub fn render(&self, assignment: &Assignment, dictionary: &Dictionary) -> String {
        let letters = self.letter_grid(assignment, dictionary);

        letters.iter().enumerate().map(|(row, line)| {
            line.iter().enumerate().map(|(col, letter)| {
                if self.fillable[row][col] {
                    letter.unwrap_or(' ')
                } else {
                    RENDERED_BLOCK
                }
            }).collect::<String>()
        }).collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use crate::{Assignment, Crossword, Dictionary, Direction, PuzzleError, Variable, DEFAULT_BLOCKED_GLYPH};
    use crate::Direction::{Across, Down};

    fn crossword(template: &str) -> Crossword {
        Crossword::from_structure(template, DEFAULT_BLOCKED_GLYPH).unwrap()
    }

    fn var(row: usize, col: usize, direction: Direction, length: usize) -> Variable {
        Variable { row, col, direction, length }
    }

    /// ___
    /// ##_
    /// ##_
    #[test]
    fn test_corner_grid_variables_and_overlap() {
        let crossword = crossword("___\n##_\n##_\n");

        assert_eq!(crossword.variables(), &[var(0, 0, Across, 3), var(0, 2, Down, 3)]);
        assert_eq!(crossword.overlap(0, 1), Some((2, 0)));
        assert_eq!(crossword.overlap(1, 0), Some((0, 2)));
        assert_eq!(crossword.degree(0), 1);
        assert_eq!(crossword.neighbors(1).collect::<Vec<_>>(), vec![0]);
    }

    /// #___#
    /// #_##_
    /// #_##_
    /// #_##_
    /// #____
    #[test]
    fn test_variables_are_sorted_by_position_then_direction() {
        let crossword = crossword("#___#\n#_##_\n#_##_\n#_##_\n#____");

        assert_eq!(crossword.variables(), &[
            var(0, 1, Across, 3),
            var(0, 1, Down, 5),
            var(1, 4, Down, 4),
            var(4, 1, Across, 4),
        ]);
        assert_eq!(crossword.overlap(0, 1), Some((0, 0)));
        assert_eq!(crossword.overlap(1, 3), Some((4, 0)));
        assert_eq!(crossword.overlap(2, 3), Some((3, 3)));
        assert_eq!(crossword.overlap(0, 2), None);
        assert_eq!(crossword.overlap(0, 3), None, "parallel variables never overlap");
        assert_eq!(crossword.neighbors(3).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_single_cells_are_not_variables() {
        let crossword = crossword("_#_\n###\n_#_");

        assert!(crossword.variables().is_empty());
        assert!(crossword.is_fillable((0, 0)));
        assert!(!crossword.is_fillable((0, 1)));
    }

    #[test]
    fn test_ragged_rows_are_padded_with_blocks() {
        let crossword = crossword("____\n_\n_");

        assert_eq!(crossword.width(), 4);
        assert_eq!(crossword.height(), 3);
        assert!(!crossword.is_fillable((1, 3)));
        assert_eq!(crossword.variables(), &[var(0, 0, Across, 4), var(0, 0, Down, 3)]);
    }

    #[test]
    fn test_trailing_whitespace_is_not_fillable() {
        let crossword = crossword("___  \n   \n___\t\n  \n");

        assert_eq!(crossword.height(), 3);
        assert_eq!(crossword.width(), 3);
        assert!(!crossword.is_fillable((0, 3)));
        assert!(!crossword.is_fillable((1, 0)));
        assert_eq!(crossword.variables(), &[var(0, 0, Across, 3), var(2, 0, Across, 3)]);
    }

    #[test]
    fn test_custom_blocked_glyph() {
        let crossword = Crossword::from_structure("..x\nx..", 'x').unwrap();

        assert_eq!(crossword.variables(), &[var(0, 0, Across, 2), var(0, 1, Down, 2), var(1, 1, Across, 2)]);
    }

    #[test]
    fn test_empty_structure_is_malformed() {
        assert!(matches!(
            Crossword::from_structure("\n\n", DEFAULT_BLOCKED_GLYPH),
            Err(PuzzleError::EmptyStructure)
        ));
    }

    #[test]
    fn test_variable_id_lookup() {
        let crossword = crossword("___\n##_\n##_");

        assert_eq!(crossword.variable_id(&var(0, 2, Down, 3)), Some(1));
        assert_eq!(crossword.variable_id(&var(0, 2, Down, 2)), None);
    }

    #[test]
    fn test_letter_grid_and_render() {
        let crossword = crossword("___\n##_\n##_");
        let dictionary = Dictionary::from_words(["cat", "tar"]).unwrap();

        let mut assignment = Assignment::new();
        assignment.insert(0, dictionary.find("cat").unwrap());

        let letters = crossword.letter_grid(&assignment, &dictionary);
        assert_eq!(letters[0], vec![Some('C'), Some('A'), Some('T')]);
        assert_eq!(letters[1][2], None);
        assert_eq!(crossword.render(&assignment, &dictionary), "CAT\n██ \n██ ");

        assignment.insert(1, dictionary.find("tar").unwrap());
        assert_eq!(crossword.render(&assignment, &dictionary), "CAT\n██A\n██R");
    }
}
