use slotmap::new_key_type;

new_key_type! {
    /// Stable identifier of an atom in an assembled topology.
    pub struct AtomId;
}
