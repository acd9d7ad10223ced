use voxelwall_common::Color;

use crate::AssetError;

/// Size of a model frame's bounding box, in voxels. `height` is the up axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelDimensions {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl VoxelDimensions {
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn volume(&self) -> usize {
        self.width * self.height * self.depth
    }

    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.width && y < self.height && z < self.depth
    }
}

/// One frame of a voxel model. Frames store animation steps or alternative
/// models of one model group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelModelFrame {
    dimensions: VoxelDimensions,
    voxels: Vec<u8>,
}

impl VoxelModelFrame {
    /// Create an empty frame.
    pub fn new(dimensions: VoxelDimensions) -> Self {
        Self {
            dimensions,
            voxels: vec![0; dimensions.volume()],
        }
    }

    pub fn dimensions(&self) -> VoxelDimensions {
        self.dimensions
    }

    pub fn has_voxel_at(&self, x: usize, y: usize, z: usize) -> bool {
        self.color_index_at(x, y, z).is_some_and(|i| i != 0)
    }

    /// Palette index at the given position. `Some(0)` is an empty voxel,
    /// `None` a position outside the frame.
    pub fn color_index_at(&self, x: usize, y: usize, z: usize) -> Option<u8> {
        self.index(x, y, z).map(|i| self.voxels[i])
    }

    pub fn set_color_index_at(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        color_index: u8,
    ) -> Result<(), AssetError> {
        let i = self
            .index(x, y, z)
            .ok_or(AssetError::VoxelOutOfBounds { x, y, z })?;
        self.voxels[i] = color_index;
        Ok(())
    }

    /// Number of non-empty voxels.
    pub fn voxel_count(&self) -> usize {
        self.voxels.iter().filter(|&&v| v != 0).count()
    }

    /// Iterate over present voxels as `(x, y, z, color_index)`.
    pub fn voxels(&self) -> impl Iterator<Item = (usize, usize, usize, u8)> + '_ {
        let VoxelDimensions { width, height, .. } = self.dimensions;
        self.voxels
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(move |(i, v)| {
                let x = i % width;
                let y = (i / width) % height;
                let z = i / (width * height);
                (x, y, z, *v)
            })
    }

    fn index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        let d = self.dimensions;
        d.contains(x, y, z)
            .then(|| x + y * d.width + z * d.width * d.height)
    }
}

/// Color palette shared by all frames of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: [Color; 256],
}

impl Default for Palette {
    /// All white.
    fn default() -> Self {
        Self {
            colors: [Color::WHITE; 256],
        }
    }
}

impl Palette {
    /// Color of a voxel. Index `0` is an empty voxel and has no color.
    pub fn color_at(&self, index: u8) -> Option<Color> {
        (index != 0).then(|| self.colors[index as usize])
    }

    pub fn set_color(&mut self, index: u8, color: Color) {
        self.colors[index as usize] = color;
    }

    pub fn colors(&self) -> &[Color; 256] {
        &self.colors
    }
}

/// A set of frames plus the palette they index into.
#[derive(Debug, Clone, Default)]
pub struct VoxelModel {
    pub frames: Vec<VoxelModelFrame>,
    pub palette: Palette,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_indexing_is_y_up() {
        let mut frame = VoxelModelFrame::new(VoxelDimensions::new(2, 3, 4));
        frame.set_color_index_at(1, 2, 3, 7).unwrap();
        assert!(frame.has_voxel_at(1, 2, 3));
        assert!(!frame.has_voxel_at(0, 0, 0));
        assert_eq!(frame.color_index_at(1, 2, 3), Some(7));
        assert_eq!(frame.voxel_count(), 1);
        assert_eq!(frame.voxels().collect::<Vec<_>>(), vec![(1, 2, 3, 7)]);
    }

    #[test]
    fn frame_out_of_bounds() {
        let mut frame = VoxelModelFrame::new(VoxelDimensions::new(2, 2, 2));
        assert_eq!(frame.color_index_at(2, 0, 0), None);
        assert!(!frame.has_voxel_at(0, 5, 0));
        assert!(matches!(
            frame.set_color_index_at(0, 0, 2, 1),
            Err(AssetError::VoxelOutOfBounds { x: 0, y: 0, z: 2 })
        ));
    }

    #[test]
    fn palette_zero_is_empty() {
        let mut palette = Palette::default();
        assert_eq!(palette.color_at(0), None);
        assert_eq!(palette.color_at(1), Some(Color::WHITE));
        palette.set_color(255, Color::BLACK);
        assert_eq!(palette.color_at(255), Some(Color::BLACK));
    }
}
