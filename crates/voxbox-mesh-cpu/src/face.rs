use voxbox_geom::Vec3;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    NegX = 0,
    PosX = 1,
    NegY = 2,
    PosY = 3,
    NegZ = 4,
    PosZ = 5,
}

/// One cube face: the step to the neighbour it looks at and its four corners.
///
/// Corners are unit-cube offsets ordered so that triangles `(0,1,2)` and `(2,1,3)`
/// both wind counter-clockwise when seen from outside.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FaceDef {
    pub face: Face,
    pub dir: [i32; 3],
    pub corners: [[u8; 3]; 4],
}

pub const FACES: [FaceDef; 6] = [
    FaceDef {
        face: Face::NegX,
        dir: [-1, 0, 0],
        corners: [[0, 1, 0], [0, 0, 0], [0, 1, 1], [0, 0, 1]],
    },
    FaceDef {
        face: Face::PosX,
        dir: [1, 0, 0],
        corners: [[1, 1, 1], [1, 0, 1], [1, 1, 0], [1, 0, 0]],
    },
    FaceDef {
        face: Face::NegY,
        dir: [0, -1, 0],
        corners: [[1, 0, 1], [0, 0, 1], [1, 0, 0], [0, 0, 0]],
    },
    FaceDef {
        face: Face::PosY,
        dir: [0, 1, 0],
        corners: [[0, 1, 1], [1, 1, 1], [0, 1, 0], [1, 1, 0]],
    },
    FaceDef {
        face: Face::NegZ,
        dir: [0, 0, -1],
        corners: [[1, 0, 0], [0, 0, 0], [1, 1, 0], [0, 1, 0]],
    },
    FaceDef {
        face: Face::PosZ,
        dir: [0, 0, 1],
        corners: [[0, 0, 1], [1, 0, 1], [0, 1, 1], [1, 1, 1]],
    },
];

impl Face {
    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    fn def(self) -> &'static FaceDef {
        &FACES[self.index()]
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let [dx, dy, dz] = self.def().dir;
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }
}
