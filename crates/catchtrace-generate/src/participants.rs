//! Per-role participant identifier pools.
//!
//! A run generates a small fixed set of participants per role once and draws
//! from it for every sample path, simulating a handful of named businesses
//! at each stage. Pools are read-only after generation.

use rand::Rng;

use catchtrace_core::{ParticipantId, Role};

use crate::fields;

/// Number of candidate participants per role.
pub const POOL_SIZE: usize = 3;

/// City/coordinate candidates per role, indexed by [`Role::index`].
const LOCATIONS: [&[(&str, &str)]; 6] = [
    &[("Denpasar", "-8.650000,115.216667")],
    &[("Banyuwangi", "-8.2192335,114.3692267")],
    &[
        ("Probolinggo", "-7.756928,113.211502"),
        ("Malang", "-7.983908,112.621391"),
    ],
    &[
        ("Surabaya", "-7.250445,112.768845"),
        ("Klaten", "-7.703403,110.600502"),
    ],
    &[
        ("Surabaya", "-7.250445,112.768845"),
        ("Sidoarjo", "-7.446923,112.718269"),
    ],
    &[
        ("Semarang", "-6.966667,110.416664"),
        ("Jakarta", "-6.200000,106.816666"),
    ],
];

/// One named business at a stage of the chain.
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub coordinate: String,
}

/// Fixed per-role participant sets for one run.
#[derive(Debug, Clone)]
pub struct ParticipantPools {
    pools: [Vec<Participant>; 6],
}

impl ParticipantPools {
    pub fn generate(rng: &mut impl Rng) -> Self {
        let pools = Role::ALL.map(|role| {
            (0..POOL_SIZE)
                .map(|index| {
                    let (_, coordinate) = pick_location(role, rng);
                    Participant {
                        id: ParticipantId::new(fields::participant_code(rng)),
                        name: format!("{}_{}_{}", region(role), role.label(), index),
                        coordinate: coordinate.to_string(),
                    }
                })
                .collect()
        });
        Self { pools }
    }

    /// Draw one participant of the given role at random.
    pub fn draw(&self, role: Role, rng: &mut impl Rng) -> &Participant {
        let pool = &self.pools[role.index()];
        &pool[rng.random_range(0..pool.len())]
    }

    pub fn of(&self, role: Role) -> &[Participant] {
        &self.pools[role.index()]
    }
}

/// Region a role's businesses operate from.
pub fn region(role: Role) -> &'static str {
    match role {
        Role::Vessel | Role::Auction | Role::Logistics => "Bali",
        Role::Processor | Role::Distributor => "Surabaya",
        Role::Retailer => "Jakarta",
    }
}

/// Draw an event location (city name + coordinate) for a role.
pub fn pick_location(role: Role, rng: &mut impl Rng) -> (&'static str, &'static str) {
    let candidates = LOCATIONS[role.index()];
    candidates[rng.random_range(0..candidates.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn pools_hold_three_participants_per_role() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let pools = ParticipantPools::generate(&mut rng);
        for role in Role::ALL {
            let pool = pools.of(role);
            assert_eq!(pool.len(), POOL_SIZE);
            for participant in pool {
                assert_eq!(participant.id.as_str().len(), 13);
                assert!(participant.name.contains(role.label()));
            }
        }
    }

    #[test]
    fn draws_come_from_the_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let pools = ParticipantPools::generate(&mut rng);
        for _ in 0..20 {
            let drawn = pools.draw(Role::Auction, &mut rng).id.clone();
            assert!(pools.of(Role::Auction).iter().any(|p| p.id == drawn));
        }
    }
}
