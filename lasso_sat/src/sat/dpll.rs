/*!
The bundled backend: a small DPLL engine over the propositional fragment.

Asserted formulas pass through a Tseitin transformation keyed by the formula
[unique_id](crate::logic::Formula::unique_id), so the definitional clauses of
a shared subformula are emitted once. The search itself is plain DPLL: unit
propagation to a fixed point, a decision on the first unassigned atom, and
chronological backtracking on conflict. No learning, no heuristics --- the
encodings this backend sees are small, and a deterministic engine keeps runs
reproducible.

Backtrack points truncate the clause store and forget the Tseitin
definitions introduced since, so a popped assertion leaves no trace.
*/

use std::collections::HashMap;

use crate::logic::{BinaryOp, Formula, FormulaId, FormulaKind, UnaryOp};
use crate::misc::log::targets;

use super::{BackendFeatures, SatBackend};

type Atom = u32;

// Atom 0 is fixed to true by a unit clause, giving the constants somewhere
// to point.
const TOP: Atom = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Lit {
    atom: Atom,
    value: bool,
}

impl Lit {
    fn new(atom: Atom, value: bool) -> Self {
        Lit { atom, value }
    }

    fn negated(self) -> Self {
        Lit { atom: self.atom, value: !self.value }
    }
}

struct Frame {
    clauses: usize,
    defs: Vec<FormulaId>,
}

struct Decision {
    trail_len: usize,
    atom: Atom,
    flipped: bool,
}

/// A DPLL engine implementing [SatBackend] for propositional formulas.
pub struct Dpll {
    atoms: HashMap<FormulaId, Atom>,
    defs: HashMap<FormulaId, Lit>,
    clauses: Vec<Vec<Lit>>,
    frames: Vec<Frame>,
    atom_count: Atom,
    assignment: Vec<Option<bool>>,
    consistent: bool,
}

impl Default for Dpll {
    fn default() -> Self {
        Self::new()
    }
}

impl Dpll {
    pub fn new() -> Self {
        let mut backend = Dpll {
            atoms: HashMap::new(),
            defs: HashMap::new(),
            clauses: Vec::new(),
            frames: Vec::new(),
            atom_count: 0,
            assignment: Vec::new(),
            consistent: false,
        };
        backend.init();
        backend
    }

    fn init(&mut self) {
        self.atom_count = TOP + 1;
        self.clauses.push(vec![Lit::new(TOP, true)]);
    }

    fn fresh_atom(&mut self) -> Atom {
        let atom = self.atom_count;
        self.atom_count += 1;
        atom
    }

    fn atom_of(&mut self, id: FormulaId) -> Atom {
        if let Some(atom) = self.atoms.get(&id) {
            return *atom;
        }
        let atom = self.fresh_atom();
        self.atoms.insert(id, atom);
        atom
    }

    fn note_def(&mut self, id: FormulaId, def: Lit) {
        self.defs.insert(id, def);
        if let Some(frame) = self.frames.last_mut() {
            frame.defs.push(id);
        }
    }

    // The defining literal of a formula, emitting definitional clauses for
    // nodes not seen before.
    fn literal(&mut self, f: Formula<'_>) -> Lit {
        match f.kind() {
            FormulaKind::Boolean(value) => Lit::new(TOP, value),

            FormulaKind::Proposition(_) | FormulaKind::Atom(..) => {
                Lit::new(self.atom_of(f.unique_id()), true)
            }

            FormulaKind::Unary(UnaryOp::Negation, arg) => self.literal(arg).negated(),

            FormulaKind::Binary(op, left, right)
                if matches!(
                    op,
                    BinaryOp::Conjunction
                        | BinaryOp::Disjunction
                        | BinaryOp::Implication
                        | BinaryOp::Iff
                ) =>
            {
                if let Some(def) = self.defs.get(&f.unique_id()) {
                    return *def;
                }

                let a = self.literal(left);
                let b = self.literal(right);
                let d = Lit::new(self.fresh_atom(), true);

                match op {
                    BinaryOp::Conjunction => {
                        self.clauses.push(vec![d.negated(), a]);
                        self.clauses.push(vec![d.negated(), b]);
                        self.clauses.push(vec![d, a.negated(), b.negated()]);
                    }
                    BinaryOp::Disjunction => {
                        self.clauses.push(vec![d.negated(), a, b]);
                        self.clauses.push(vec![d, a.negated()]);
                        self.clauses.push(vec![d, b.negated()]);
                    }
                    BinaryOp::Implication => {
                        self.clauses.push(vec![d.negated(), a.negated(), b]);
                        self.clauses.push(vec![d, a]);
                        self.clauses.push(vec![d, b.negated()]);
                    }
                    BinaryOp::Iff => {
                        self.clauses.push(vec![d.negated(), a.negated(), b]);
                        self.clauses.push(vec![d.negated(), a, b.negated()]);
                        self.clauses.push(vec![d, a, b]);
                        self.clauses.push(vec![d, a.negated(), b.negated()]);
                    }
                    _ => {}
                }

                self.note_def(f.unique_id(), d);
                d
            }

            _ => panic!("! Non-propositional formula asserted to the dpll backend: {f}"),
        }
    }

    // Unit propagation to a fixed point. False on an unsatisfied clause.
    fn propagate(clauses: &[Vec<Lit>], value: &mut [Option<bool>], trail: &mut Vec<Atom>) -> bool {
        loop {
            let mut changed = false;

            'clauses: for clause in clauses {
                let mut unit = None;
                let mut unassigned = 0;

                for lit in clause {
                    match value[lit.atom as usize] {
                        Some(v) if v == lit.value => continue 'clauses,
                        Some(_) => {}
                        None => {
                            unassigned += 1;
                            unit = Some(*lit);
                        }
                    }
                }

                match (unassigned, unit) {
                    (0, _) => return false,
                    (1, Some(lit)) => {
                        value[lit.atom as usize] = Some(lit.value);
                        trail.push(lit.atom);
                        changed = true;
                    }
                    _ => {}
                }
            }

            if !changed {
                return true;
            }
        }
    }
}

impl SatBackend for Dpll {
    fn features(&self) -> BackendFeatures {
        BackendFeatures { propositional: true, smt: false, quantifiers: false, push_pop: true }
    }

    fn assert_formula(&mut self, f: Formula<'_>) {
        let lit = self.literal(f);
        self.clauses.push(vec![lit]);
    }

    fn push(&mut self) {
        self.frames.push(Frame { clauses: self.clauses.len(), defs: Vec::new() });
    }

    fn pop(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.clauses.truncate(frame.clauses);
            for id in frame.defs {
                self.defs.remove(&id);
            }
        }
    }

    fn solve(&mut self) -> bool {
        let n = self.atom_count as usize;
        let mut value: Vec<Option<bool>> = vec![None; n];
        let mut trail: Vec<Atom> = Vec::new();
        let mut decisions: Vec<Decision> = Vec::new();

        log::trace!(
            target: targets::BACKEND,
            "solving over {} atoms and {} clauses",
            self.atom_count,
            self.clauses.len()
        );

        loop {
            if Self::propagate(&self.clauses, &mut value, &mut trail) {
                // Stable: decide on the first unassigned atom, or report the
                // complete valuation.
                match value.iter().position(|v| v.is_none()) {
                    Some(atom) => {
                        decisions.push(Decision {
                            trail_len: trail.len(),
                            atom: atom as Atom,
                            flipped: false,
                        });
                        value[atom] = Some(true);
                        trail.push(atom as Atom);
                    }
                    None => {
                        self.assignment = value;
                        self.consistent = true;
                        return true;
                    }
                }
            } else {
                // Conflict: flip the most recent unflipped decision.
                loop {
                    let Some(decision) = decisions.pop() else {
                        self.consistent = false;
                        return false;
                    };

                    while trail.len() > decision.trail_len {
                        if let Some(atom) = trail.pop() {
                            value[atom as usize] = None;
                        }
                    }

                    if !decision.flipped {
                        value[decision.atom as usize] = Some(false);
                        trail.push(decision.atom);
                        decisions.push(Decision {
                            trail_len: decision.trail_len,
                            atom: decision.atom,
                            flipped: true,
                        });
                        break;
                    }
                }
            }
        }
    }

    fn value(&self, p: Formula<'_>) -> Option<bool> {
        if !self.consistent {
            return None;
        }
        let atom = self.atoms.get(&p.unique_id())?;
        self.assignment.get(*atom as usize).copied().flatten()
    }

    fn clear(&mut self) {
        self.atoms.clear();
        self.defs.clear();
        self.clauses.clear();
        self.frames.clear();
        self.assignment.clear();
        self.consistent = false;
        self.init();
    }
}
