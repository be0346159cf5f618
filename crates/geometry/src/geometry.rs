//! Volume hierarchy
//!
//! A small arena of logical volumes (shape + material) and physical
//! placements of them. Handles are plain indices into the arena, so they are
//! cheap to copy and compare, and equality of handles is equality of volumes.

// crate modules
use crate::error::{Error, Result};
use crate::material::Material;
use crate::solid::BoxSolid;

// foiltools modules
use foiltools_format::f;

// external crates
use log::trace;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Handle to a [LogicalVolume] in a [Geometry]
///
/// Handles can be built from raw indices for engines that pass them across a
/// language boundary as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogicalId(usize);

impl LogicalId {
    /// Index into the logical volume arena
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for LogicalId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Handle to a [PhysicalVolume] in a [Geometry]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhysicalId(usize);

impl PhysicalId {
    /// Index into the placement arena
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for PhysicalId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Shape and material, independent of where it is placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalVolume {
    /// Name of the logical volume
    pub name: String,
    /// Box shape
    pub solid: BoxSolid,
    /// Material filling the shape
    pub material: Material,
}

impl LogicalVolume {
    /// Bundle a solid and a material under a name
    pub fn new(name: &str, solid: BoxSolid, material: Material) -> Self {
        Self {
            name: name.to_string(),
            solid,
            material,
        }
    }
}

/// A single placement of a [LogicalVolume] inside a mother placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalVolume {
    /// Name of the placement
    pub name: String,
    /// Volume being placed
    pub logical: LogicalId,
    /// Placement this one sits in, `None` only for the world
    pub mother: Option<PhysicalId>,
    /// Offset of the centre relative to the mother centre
    pub translation: Vector3<f64>,
    /// Copy number, distinguishes repeated placements of one logical volume
    pub copy_no: i32,
}

/// Arena of logical volumes and their placements
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    logicals: Vec<LogicalVolume>,
    physicals: Vec<PhysicalVolume>,
    daughters: Vec<Vec<PhysicalId>>,
    world: Option<PhysicalId>,
    check_overlaps: bool,
}

impl Geometry {
    /// Empty geometry, optionally checking every placement for overlaps
    pub fn new(check_overlaps: bool) -> Self {
        Self {
            check_overlaps,
            ..Default::default()
        }
    }

    /// Register a logical volume and get its handle
    pub fn add_logical(&mut self, logical: LogicalVolume) -> LogicalId {
        self.logicals.push(logical);
        LogicalId(self.logicals.len() - 1)
    }

    /// Place the top level volume at the origin
    ///
    /// There can only be one world.
    pub fn place_world(&mut self, name: &str, logical: LogicalId) -> Result<PhysicalId> {
        if let Some(world) = self.world {
            return Err(Error::InvalidPlacement(f!(
                "\"{name}\" can not replace existing world \"{}\"",
                self.physicals[world.0].name
            )));
        }
        self.logical(logical)?;

        let id = self.push_physical(PhysicalVolume {
            name: name.to_string(),
            logical,
            mother: None,
            translation: Vector3::zeros(),
            copy_no: 0,
        });
        self.world = Some(id);
        Ok(id)
    }

    /// Place a logical volume inside a mother placement
    ///
    /// When overlap checking is enabled the new placement must sit inside the
    /// mother and must not overlap any of its siblings.
    pub fn place(
        &mut self,
        name: &str,
        logical: LogicalId,
        mother: PhysicalId,
        translation: Vector3<f64>,
        copy_no: i32,
    ) -> Result<PhysicalId> {
        let solid = &self.logical(logical)?.solid;
        let mother_volume = self.physical(mother)?;

        if self.check_overlaps {
            let mother_solid = &self.logical(mother_volume.logical)?.solid;
            if !solid.fits_inside(&translation, mother_solid) {
                return Err(Error::OutsideMother {
                    daughter: name.to_string(),
                    mother: mother_volume.name.clone(),
                });
            }

            for sibling in &self.daughters[mother.0] {
                let sibling = &self.physicals[sibling.0];
                let sibling_solid = &self.logicals[sibling.logical.0].solid;
                if solid.overlaps(&translation, sibling_solid, &sibling.translation) {
                    return Err(Error::Overlap {
                        placed: f!("{name}:{copy_no}"),
                        existing: f!("{}:{}", sibling.name, sibling.copy_no),
                    });
                }
            }
        }

        trace!(
            "placing {name}:{copy_no} in {} at {:?}",
            mother_volume.name,
            translation.as_slice()
        );

        let id = self.push_physical(PhysicalVolume {
            name: name.to_string(),
            logical,
            mother: Some(mother),
            translation,
            copy_no,
        });
        self.daughters[mother.0].push(id);
        Ok(id)
    }

    /// Handle of the world placement, if one has been placed
    pub fn world(&self) -> Option<PhysicalId> {
        self.world
    }

    /// Look up a logical volume
    pub fn logical(&self, id: LogicalId) -> Result<&LogicalVolume> {
        self.logicals.get(id.0).ok_or(Error::UnknownLogical(id.0))
    }

    /// Look up a placement
    pub fn physical(&self, id: PhysicalId) -> Result<&PhysicalVolume> {
        self.physicals.get(id.0).ok_or(Error::UnknownPhysical(id.0))
    }

    /// Logical volume placed by a physical placement
    pub fn logical_of(&self, id: PhysicalId) -> Option<LogicalId> {
        self.physicals.get(id.0).map(|p| p.logical)
    }

    /// Placements directly inside `id`
    pub fn daughters(&self, id: PhysicalId) -> &[PhysicalId] {
        self.daughters.get(id.0).map(Vec::as_slice).unwrap_or_default()
    }

    /// All placements in the order they were made
    pub fn placements(&self) -> impl Iterator<Item = (PhysicalId, &PhysicalVolume)> {
        self.physicals
            .iter()
            .enumerate()
            .map(|(i, p)| (PhysicalId(i), p))
    }

    /// Number of logical volumes
    pub fn number_of_logicals(&self) -> usize {
        self.logicals.len()
    }

    /// Number of placements, including the world
    pub fn number_of_placements(&self) -> usize {
        self.physicals.len()
    }

    /// Centre of a placement in world coordinates
    pub fn global_translation(&self, id: PhysicalId) -> Result<Vector3<f64>> {
        let mut volume = self.physical(id)?;
        let mut translation = volume.translation;
        while let Some(mother) = volume.mother {
            volume = self.physical(mother)?;
            translation += volume.translation;
        }
        Ok(translation)
    }

    /// Deepest placement containing a point given in world coordinates
    ///
    /// Returns `None` for points outside the world. Surfaces belong to the
    /// daughter, and where daughters touch the first placed wins.
    pub fn locate(&self, point: &Vector3<f64>) -> Option<PhysicalId> {
        let world = self.world?;
        let world_volume = &self.physicals[world.0];
        let mut local = point - world_volume.translation;
        if !self.logicals[world_volume.logical.0].solid.contains(&local) {
            return None;
        }

        let mut current = world;
        'descend: loop {
            for daughter in &self.daughters[current.0] {
                let volume = &self.physicals[daughter.0];
                let daughter_local = local - volume.translation;
                if self.logicals[volume.logical.0]
                    .solid
                    .contains(&daughter_local)
                {
                    current = *daughter;
                    local = daughter_local;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    fn push_physical(&mut self, physical: PhysicalVolume) -> PhysicalId {
        self.physicals.push(physical);
        self.daughters.push(Vec::new());
        PhysicalId(self.physicals.len() - 1)
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Geometry {\n".to_string();
        let mut stack: Vec<(PhysicalId, usize)> = self.world.map(|w| (w, 1)).into_iter().collect();

        while let Some((id, depth)) = stack.pop() {
            let volume = &self.physicals[id.0];
            let logical = &self.logicals[volume.logical.0];
            s += &f!(
                "{:indent$}{}:{} [{}] {}\n",
                "",
                volume.name,
                volume.copy_no,
                logical.name,
                logical.material.name,
                indent = depth * 4
            );
            // reversed so daughters print in placement order
            for daughter in self.daughters[id.0].iter().rev() {
                stack.push((*daughter, depth + 1));
            }
        }
        s += "}";

        write!(f, "{}", s)
    }
}
