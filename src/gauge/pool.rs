/*
Pip Gauge - by David Petnick
*/
use super::config::PipCounts;

/// Creates and Releases the Elements Backing Pips / Mirrors
/// The Plugin Spawns Sprite Entities, Tests Hand Out Plain Ids
pub trait ElementSpawner<E> {
    fn spawn_pip(&mut self, index: usize) -> E;
    fn spawn_mirror(&mut self, index: usize) -> E;
    fn release(&mut self, element: E);
}

/// Result of One Frame's Pool Sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// Pool Matches Counts, Layout Can Run
    Ready,
    /// Pool Changed This Frame, Layout Waits a Frame
    Deferred,
}

/// Pips and Their Mirrors, Index 'i' in One Pairs With Index 'i' in the Other
/// Only Grows / Shrinks at the Tail
#[derive(Debug, Clone)]
pub struct PipPool<E> {
    pips: Vec<E>,
    mirrors: Vec<E>,
}

impl<E> Default for PipPool<E> {
    fn default() -> Self {
        Self {
            pips: Vec::new(),
            mirrors: Vec::new(),
        }
    }
}

impl<E: Copy> PipPool<E> {
    #[inline]
    pub fn len(&self) -> usize {
        self.pips.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pips.is_empty()
    }

    pub fn pips(&self) -> &[E] {
        &self.pips
    }

    pub fn mirrors(&self) -> &[E] {
        &self.mirrors
    }

    pub fn pip(&self, i: usize) -> Option<E> {
        self.pips.get(i).copied()
    }

    pub fn mirror(&self, i: usize) -> Option<E> {
        self.mirrors.get(i).copied()
    }

    /// Bring the Pool in Line With 'counts' / 'mirror'
    ///
    /// Growing Happens All at Once, Shrinking Releases One Trailing
    /// Pip (Plus its Mirror) per Call. Any Change Defers Layout
    pub fn reconcile(
        &mut self,
        counts: PipCounts,
        mirror: bool,
        spawner: &mut impl ElementSpawner<E>,
    ) -> Reconcile {
        // Mirroring Switched Off: Drop Every Mirror
        if !mirror && !self.mirrors.is_empty() {
            for m in self.mirrors.drain(..) {
                spawner.release(m);
            }
            return Reconcile::Deferred;
        }

        if self.pips.len() < counts.max {
            for i in self.pips.len()..counts.max {
                self.pips.push(spawner.spawn_pip(i));
                if mirror && self.mirrors.len() == i {
                    self.mirrors.push(spawner.spawn_mirror(i));
                }
            }
            if mirror {
                self.fill_mirrors(spawner);
            }
            return Reconcile::Deferred;
        }

        // Mirroring Switched On After Pips Already Exist
        if mirror && self.mirrors.len() < self.pips.len() {
            self.fill_mirrors(spawner);
            return Reconcile::Deferred;
        }

        if self.pips.len() > counts.max {
            self.pop_tail(spawner);
            return Reconcile::Deferred;
        }

        Reconcile::Ready
    }

    fn fill_mirrors(&mut self, spawner: &mut impl ElementSpawner<E>) {
        for i in self.mirrors.len()..self.pips.len() {
            self.mirrors.push(spawner.spawn_mirror(i));
        }
    }

    fn pop_tail(&mut self, spawner: &mut impl ElementSpawner<E>) {
        let Some(pip) = self.pips.pop() else { return; };
        spawner.release(pip);

        // Keep Mirrors No Longer Than Pips
        while self.mirrors.len() > self.pips.len() {
            if let Some(m) = self.mirrors.pop() {
                spawner.release(m);
            }
        }
    }

    /// Hand Every Element Back (Gauge Teardown)
    pub fn release_all(&mut self, spawner: &mut impl ElementSpawner<E>) {
        for m in self.mirrors.drain(..) {
            spawner.release(m);
        }
        for p in self.pips.drain(..) {
            spawner.release(p);
        }
    }
}
