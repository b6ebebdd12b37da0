/*!
The encodings of the bounded search at bound `k`.

- The *k-unraveling* advances the encoding one step: at `k = 0` it is the
  ground XNF of the asserted formula; afterwards it ties every obligation
  `⟨X ψ, k-1⟩` of the closure to the unfolding of `ψ` at `k`.
- *EMPTY* asserts no obligation is pending at `k`: the model may stop.
- *LOOP* asserts some `l < k` is bisimilar to `k` with respect to pending
  obligations, and every pending eventuality is fulfilled inside the period.
- *PRUNE* forbids lassos whose period repeats work a shorter lasso already
  did; its negation is asserted to keep the search from circling.

Each encoding folds over the request or closure sets in insertion order, so
identical inputs produce structurally identical encodings on every run.
*/

use crate::logic::simplify::simplify;
use crate::logic::{big_and, big_or, BinaryOp, Formula, FormulaKind, UnaryOp};
use crate::misc::log::targets;
use crate::solver::Solver;

/// The fulfilment a pending `X ψ` calls for, when `ψ` is an eventuality:
/// `φ` for `F φ`, `ψ` for `φ U ψ`, and `φ ∧ ψ` for `φ M ψ`.
fn x_eventuality(x: Formula<'_>) -> Option<Formula<'_>> {
    let (UnaryOp::Tomorrow, operand) = x.as_unary()? else {
        return None;
    };

    match operand.kind() {
        FormulaKind::Unary(UnaryOp::Eventually, arg) => Some(arg),
        FormulaKind::Binary(BinaryOp::Until, _, right) => Some(right),
        FormulaKind::Binary(BinaryOp::SRelease, left, right) => Some(left & right),
        _ => None,
    }
}

impl<'a> Solver<'a> {
    /// The k-unraveling. Rebuilds the pending X-requests for step `k`.
    pub(crate) fn k_unraveling(&mut self, frm: Formula<'a>, k: usize) -> Formula<'a> {
        self.x_requests.clear();

        if k == 0 {
            return self.ground_xnf(frm, 0, true);
        }

        let sigma = self.sigma;
        let closure: Vec<_> = self.x_closure.iter().copied().collect();

        let unraveling = big_and(
            sigma,
            closure.into_iter().map(|x| {
                let operand = x.as_unary().map(|(_, arg)| arg).unwrap_or(x);
                let left = sigma.timed_var(x, k - 1);
                let right = self.ground_xnf(operand, k, true);
                left.iff(right)
            }),
        );

        log::trace!(
            target: targets::ENCODE,
            "unraveling at {k} leaves {} pending requests",
            self.x_requests.len()
        );

        unraveling
    }

    /// EMPTY at `k`: no pending obligation remains.
    pub(crate) fn k_empty(&self, k: usize) -> Formula<'a> {
        let sigma = self.sigma;
        big_and(sigma, self.x_requests.iter().map(|x| !sigma.timed_var(*x, k)))
    }

    /// LOOP at `k`: some `l < k` closes a lasso.
    pub(crate) fn k_loop(&mut self, k: usize) -> Formula<'a> {
        let sigma = self.sigma;
        big_or(
            sigma,
            (0..k).map(|l| simplify(self.l_to_k_loop(l, k) & self.l_to_k_period(l, k))),
        )
    }

    // States `l` and `k` agree on every pending obligation.
    pub(crate) fn l_to_k_loop(&self, l: usize, k: usize) -> Formula<'a> {
        let sigma = self.sigma;
        big_and(
            sigma,
            self.x_requests
                .iter()
                .map(|x| sigma.timed_var(*x, l).iff(sigma.timed_var(*x, k))),
        )
    }

    // Every eventuality pending at `k` is fulfilled somewhere in `l+1..=k`.
    pub(crate) fn l_to_k_period(&mut self, l: usize, k: usize) -> Formula<'a> {
        let sigma = self.sigma;
        let requests: Vec<_> = self.x_requests.iter().copied().collect();

        big_and(
            sigma,
            requests.into_iter().filter_map(|x| {
                let fulfilment = x_eventuality(x)?;
                let fulfilled = big_or(
                    sigma,
                    (l + 1..=k).map(|i| self.ground_xnf(fulfilment, i, false)),
                );
                Some(sigma.timed_var(x, k).implies(fulfilled))
            }),
        )
    }

    /// PRUNE at `k`: some pair `l < j < k` shows the lasso through `j`
    /// redundant.
    pub(crate) fn prune(&mut self, k: usize) -> Formula<'a> {
        let sigma = self.sigma;
        let pairs: Vec<_> = (0..k)
            .flat_map(|l| (l + 1..k).map(move |j| (l, j)))
            .collect();

        big_or(
            sigma,
            pairs.into_iter().map(|(l, j)| {
                let loops = simplify(self.l_to_k_loop(l, j) & self.l_to_k_loop(j, k));
                simplify(loops & self.l_j_k_prune(l, j, k))
            }),
        )
    }

    // Whatever the period `j+1..=k` fulfils, the period `l+1..=j` already
    // fulfilled.
    pub(crate) fn l_j_k_prune(&mut self, l: usize, j: usize, k: usize) -> Formula<'a> {
        let sigma = self.sigma;
        let requests: Vec<_> = self.x_requests.iter().copied().collect();

        big_and(
            sigma,
            requests.into_iter().filter_map(|x| {
                let fulfilment = x_eventuality(x)?;
                let outer = big_or(
                    sigma,
                    (j + 1..=k).map(|i| self.ground_xnf(fulfilment, i, false)),
                );
                let inner = big_or(
                    sigma,
                    (l + 1..=j).map(|i| self.ground_xnf(fulfilment, i, false)),
                );
                Some((sigma.timed_var(x, k) & outer).implies(inner))
            }),
        )
    }
}
