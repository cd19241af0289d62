//! A world replaying a fixed list of impacts, for tests.

use crate::impact::RayHit;
use crate::world::{RayCallback, SegmentTest, FULL_SEGMENT, STOP_SCAN};
use crate::Real;
use na::{Point3, Vector3};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScriptedShape {
    pub solid: bool,
}

#[derive(Default, Debug)]
struct ScanLog {
    candidates: Vec<u32>,
    reported: Vec<u32>,
}

/// Reports its impacts in the given order, honoring the bound returned by the callback.
#[derive(Clone, Debug)]
pub struct ScriptedWorld {
    impacts: Rc<Vec<(u32, Real)>>,
    sensors: Rc<RefCell<HashSet<u32>>>,
    log: Rc<RefCell<ScanLog>>,
}

impl ScriptedWorld {
    pub fn new(impacts: &[(u32, Real)]) -> Self {
        Self {
            impacts: Rc::new(impacts.to_vec()),
            sensors: Rc::default(),
            log: Rc::default(),
        }
    }

    pub fn set_sensor(&self, body: u32) {
        self.sensors.borrow_mut().insert(body);
    }

    /// Bodies offered to the admission filter during the last scan.
    pub fn candidates(&self) -> Vec<u32> {
        self.log.borrow().candidates.clone()
    }

    /// Bodies reported to the impact callback during the last scan.
    pub fn reported(&self) -> Vec<u32> {
        self.log.borrow().reported.clone()
    }

    pub fn same_world(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.impacts, &other.impacts)
    }
}

impl SegmentTest for ScriptedWorld {
    type Body = u32;
    type Shape = ScriptedShape;

    fn segment_test(
        &self,
        _start: &Point3<Real>,
        _end: &Point3<Real>,
        callback: &mut dyn RayCallback<u32, ScriptedShape>,
    ) {
        let mut log = self.log.borrow_mut();
        *log = ScanLog::default();
        let mut bound = FULL_SEGMENT;

        for &(body, t) in self.impacts.iter() {
            if t > bound {
                continue;
            }

            log.candidates.push(body);
            let shape = ScriptedShape {
                solid: !self.sensors.borrow().contains(&body),
            };
            if !callback.admit(body, &shape).is_admitted() {
                continue;
            }

            log.reported.push(body);
            let next = callback.report_impact(RayHit {
                body,
                normal: -Vector3::x(),
                collision_id: body as u64 * 10,
                intersection_param: t,
            });
            if next <= STOP_SCAN {
                break;
            }
            bound = bound.min(next);
        }
    }
}
