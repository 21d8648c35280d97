/// A covalent bond between two atoms, stored as an unordered pair.
///
/// The endpoints are normalized on construction so that `Bond::new(a, b)` and
/// `Bond::new(b, a)` compare and hash identically. The index type is generic: residue
/// templates use plain `usize` atom indices, assembled topologies use `AtomId` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bond<I> {
    atom1: I,
    atom2: I,
}

impl<I: Copy + Ord> Bond<I> {
    pub fn new(a: I, b: I) -> Self {
        if a <= b {
            Self { atom1: a, atom2: b }
        } else {
            Self { atom1: b, atom2: a }
        }
    }

    /// The endpoint with the smaller index.
    pub fn atom1(&self) -> I {
        self.atom1
    }

    /// The endpoint with the larger index.
    pub fn atom2(&self) -> I {
        self.atom2
    }

    pub fn atoms(&self) -> (I, I) {
        (self.atom1, self.atom2)
    }

    pub fn contains(&self, atom: I) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }

    /// Returns the endpoint opposite to `atom`, or `None` if `atom` is not part of the bond.
    pub fn partner(&self, atom: I) -> Option<I> {
        if self.atom1 == atom {
            Some(self.atom2)
        } else if self.atom2 == atom {
            Some(self.atom1)
        } else {
            None
        }
    }

    /// Maps both endpoints through `f`, re-normalizing the result.
    pub fn map<J: Copy + Ord>(&self, mut f: impl FnMut(I) -> J) -> Bond<J> {
        Bond::new(f(self.atom1), f(self.atom2))
    }
}
