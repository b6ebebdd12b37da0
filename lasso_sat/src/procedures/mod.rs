/*!
The procedures of a solve, factored by topic.

The pure formula transformations ([to_nnf], [remove_past]) are free
functions; everything touching solver state (the X-closure, the ground
encodings, the solve loop itself) is implemented on
[Solver](crate::solver::Solver) in the module of its topic.
*/

pub mod closure;
pub mod encode;
pub mod nnf;
pub mod past;
pub mod solve;
pub mod xnf;

pub use nnf::to_nnf;
pub use past::remove_past;
