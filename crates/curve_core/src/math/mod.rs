//! Numerical routines: root-finding and least-squares solvers.

pub mod solvers;
