use crate::define_index_newtype;

define_index_newtype!(VehicleIdx, Vehicle);

/// A delivery vehicle. Vehicles are homogeneous apart from their capacity.
#[derive(Clone, Debug)]
pub struct Vehicle {
    capacity: f64,
}

impl Vehicle {
    pub fn new(capacity: f64) -> Self {
        Vehicle { capacity }
    }

    #[inline]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }
}
