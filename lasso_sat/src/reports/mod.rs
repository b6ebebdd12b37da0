/*!
Reports of a solve: the verdict, and the model witnessing a satisfiable one.
*/

use std::collections::HashMap;

use crate::logic::{Formula, FormulaId};

/// High-level reports regarding a solve.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The asserted formula is satisfiable.
    Satisfiable,

    /// The asserted formula is unsatisfiable.
    Unsatisfiable,

    /// The bound was reached without a verdict.
    Unknown,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "SAT"),
            Self::Unsatisfiable => write!(f, "UNSAT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// An ultimately-periodic model of a satisfiable formula.
///
/// The model has `size` states, `0..size`, and loops from the last state
/// back to [loop_index](Model::loop_index). Atom values are those the
/// backend reported for the ground propositions `⟨atom, step⟩`; an atom the
/// encoding never constrained at a step has no value.
#[derive(Clone, Debug)]
pub struct Model {
    size: usize,
    loop_index: usize,
    values: HashMap<(FormulaId, usize), bool>,
}

impl Model {
    pub(crate) fn new(
        size: usize,
        loop_index: usize,
        values: HashMap<(FormulaId, usize), bool>,
    ) -> Self {
        Model { size, loop_index, values }
    }

    /// The number of states, `k + 1` for a verdict found at bound `k`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The state the model loops back to.
    pub fn loop_index(&self) -> usize {
        self.loop_index
    }

    /// The value of an atom of the input formula at a time step, if the
    /// model constrains it.
    pub fn value(&self, atom: Formula<'_>, step: usize) -> Option<bool> {
        self.values.get(&(atom.unique_id(), step)).copied()
    }
}
