// SPDX-License-Identifier: MIT

/// Volume geometry expressed in allocation units (clusters on FAT).
///
/// `Unit` is the cluster number type of the filesystem.
pub trait FsMeta<Unit: Ord + Copy> {
    /// Bytes per cluster.
    fn unit_size(&self) -> usize;

    /// Absolute byte offset of `unit` in the image.
    fn unit_offset(&self, unit: Unit) -> u64;

    /// The unit a directory entry uses to point at the root directory.
    fn root_unit(&self) -> Unit;

    fn first_data_unit(&self) -> Unit;

    /// Highest cluster number backed by the data region.
    fn last_data_unit(&self) -> Unit;

    fn total_units(&self) -> usize;

    /// Image size implied by the geometry.
    fn size_bytes(&self) -> u64;

    /// Inside `first_data_unit()..=last_data_unit()`.
    fn is_valid_unit(&self, unit: Unit) -> bool {
        (self.first_data_unit()..=self.last_data_unit()).contains(&unit)
    }
}
