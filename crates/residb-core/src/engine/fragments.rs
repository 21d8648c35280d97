//! Topological analysis behind internal-coordinate changes.
//!
//! Changing a bond length, a bond angle or a dihedral moves the atoms on one side of the
//! coordinate relative to the other. The functions here find those two atom sets from the
//! bond graph alone. A coordinate that lies inside a ring has no such split and is
//! rejected.

use super::topology::MolecularTopology;
use crate::core::models::ids::AtomId;
use std::collections::{BTreeSet, HashSet, VecDeque};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FragmentError {
    #[error("Atom {0:?} is not part of the topology")]
    UnknownAtom(AtomId),
    #[error("Atom {0:?} appears more than once in the coordinate")]
    RepeatedAtom(AtomId),
    #[error("No bond between atoms {0:?} and {1:?}")]
    NotBonded(AtomId, AtomId),
    #[error("Cyclic bond structure: the coordinate lies in a ring")]
    CyclicStructure,
}

/// The two atom sets separated by an internal coordinate.
///
/// `first` is the side of the first atom of the coordinate, `second` the side of the last.
/// Pivot atoms (the centre of an angle, the axis of a dihedral) belong to neither set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentPair {
    pub first: BTreeSet<AtomId>,
    pub second: BTreeSet<AtomId>,
}

impl FragmentPair {
    /// The smaller side, which is the cheaper one to move.
    pub fn smaller(&self) -> &BTreeSet<AtomId> {
        if self.second.len() < self.first.len() {
            &self.second
        } else {
            &self.first
        }
    }
}

/// Splits the molecule at the bond `atom1`-`atom2`.
pub fn bond_length(
    topology: &MolecularTopology,
    atom1: AtomId,
    atom2: AtomId,
) -> Result<FragmentPair, FragmentError> {
    check_chain(topology, &[atom1, atom2])?;
    let excluded = [atom2];
    let first = collect_side(topology, atom1, &excluded, atom2, true)?;
    let excluded = [atom1];
    let second = collect_side(topology, atom2, &excluded, atom1, true)?;
    Ok(FragmentPair { first, second })
}

/// Splits the molecule at the angle `atom1`-`atom2`-`atom3`; `atom2` is the pivot.
pub fn bond_angle(
    topology: &MolecularTopology,
    atom1: AtomId,
    atom2: AtomId,
    atom3: AtomId,
) -> Result<FragmentPair, FragmentError> {
    check_chain(topology, &[atom1, atom2, atom3])?;
    let excluded = [atom2];
    let first = collect_side(topology, atom1, &excluded, atom3, false)?;
    let second = collect_side(topology, atom3, &excluded, atom1, false)?;
    Ok(FragmentPair { first, second })
}

/// Splits the molecule at the dihedral `atom1`-`atom2`-`atom3`-`atom4`; the central bond
/// `atom2`-`atom3` is the rotation axis.
pub fn dihedral(
    topology: &MolecularTopology,
    atom1: AtomId,
    atom2: AtomId,
    atom3: AtomId,
    atom4: AtomId,
) -> Result<FragmentPair, FragmentError> {
    check_chain(topology, &[atom1, atom2, atom3, atom4])?;
    let excluded = [atom2, atom3];
    let first = collect_side(topology, atom1, &excluded, atom4, false)?;
    let second = collect_side(topology, atom4, &excluded, atom1, false)?;
    Ok(FragmentPair { first, second })
}

/// Atoms must exist, be distinct, and consecutive atoms must be bonded.
fn check_chain(topology: &MolecularTopology, atoms: &[AtomId]) -> Result<(), FragmentError> {
    let mut seen = HashSet::with_capacity(atoms.len());
    for &atom in atoms {
        if !topology.contains_atom(atom) {
            return Err(FragmentError::UnknownAtom(atom));
        }
        if !seen.insert(atom) {
            return Err(FragmentError::RepeatedAtom(atom));
        }
    }
    for pair in atoms.windows(2) {
        if !topology.are_bonded(pair[0], pair[1]) {
            return Err(FragmentError::NotBonded(pair[0], pair[1]));
        }
    }
    Ok(())
}

/// Breadth-first search from `start` that never enters `excluded` atoms.
///
/// With `excluded_first_only`, the exclusion applies to the first step only, so an
/// excluded atom reached later through another path is added like any other atom.
/// Reaching `forbidden` means the two sides are connected by a second path.
fn collect_side(
    topology: &MolecularTopology,
    start: AtomId,
    excluded: &[AtomId],
    forbidden: AtomId,
    excluded_first_only: bool,
) -> Result<BTreeSet<AtomId>, FragmentError> {
    let mut visited = BTreeSet::from([start]);
    let mut frontier = VecDeque::from([(start, 0usize)]);

    while let Some((current, depth)) = frontier.pop_front() {
        let neighbors = topology.neighbors(current).unwrap_or(&[]);
        for &next in neighbors {
            let blocked = excluded.contains(&next) && (!excluded_first_only || depth == 0);
            if blocked || visited.contains(&next) {
                continue;
            }
            visited.insert(next);
            frontier.push_back((next, depth + 1));
        }
    }

    if visited.contains(&forbidden) {
        return Err(FragmentError::CyclicStructure);
    }
    Ok(visited)
}
