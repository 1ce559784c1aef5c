use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::role::Role;

/// Immutable configuration of one supply-chain path.
///
/// Parsed from the digit strings the CLI accepts: one role code per position
/// plus three control digits per position. All stages read their control
/// values from this object; nothing is ambient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    roles: Vec<Role>,
    merge: Vec<u32>,
    split_product: Vec<u32>,
    split_path: Vec<u32>,
    reuse_participants: bool,
}

impl PathConfig {
    /// Parse the four digit strings into a validated configuration.
    pub fn parse(
        pis: &str,
        merge_gtin: &str,
        split_gtin: &str,
        split_pi: &str,
        reuse_participants: bool,
    ) -> Result<Self> {
        if pis.is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        let mut roles = Vec::with_capacity(pis.len());
        for (position, code) in pis.chars().enumerate() {
            let role = Role::from_code(code)
                .ok_or(ConfigError::InvalidRoleCode { code, position })?;
            roles.push(role);
        }

        let merge = parse_control(merge_gtin, "merge_gtin", roles.len())?;
        let split_product = parse_control(split_gtin, "split_gtin", roles.len())?;
        let split_path = parse_control(split_pi, "split_pi", roles.len())?;

        let config = Self {
            roles,
            merge,
            split_product,
            split_path,
            reuse_participants,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn role_at(&self, position: usize) -> Option<Role> {
        self.roles.get(position).copied()
    }

    pub fn reuse_participants(&self) -> bool {
        self.reuse_participants
    }

    /// Raw merge control value at a position (0 = disabled).
    pub fn merge_at(&self, position: usize) -> u32 {
        self.merge.get(position).copied().unwrap_or(0)
    }

    /// Raw product-split control value at a position (0 = disabled).
    pub fn product_split_at(&self, position: usize) -> u32 {
        self.split_product.get(position).copied().unwrap_or(0)
    }

    /// Raw path-split control value at a position (0/1 = disabled).
    pub fn path_split_at(&self, position: usize) -> u32 {
        self.split_path.get(position).copied().unwrap_or(0)
    }

    /// Effective output-product count at a position (disabled counts as 1).
    pub fn product_split_eff(&self, position: usize) -> u32 {
        self.product_split_at(position).max(1)
    }

    /// Effective downstream-branch count at a position (disabled counts as 1).
    pub fn path_split_eff(&self, position: usize) -> u32 {
        self.path_split_at(position).max(1)
    }

    /// First position with a merge factor configured, with that factor.
    /// `None` when the path has no merge point.
    pub fn merge_point(&self) -> Option<(usize, u32)> {
        self.merge
            .iter()
            .position(|factor| *factor >= 1)
            .map(|position| (position, self.merge[position]))
    }

    /// Role the stage at `position` ships to: the next role in the path,
    /// skipping over logistics hops (those carry, they do not receive).
    pub fn customer_role_after(&self, position: usize) -> Option<Role> {
        self.roles[position + 1..]
            .iter()
            .copied()
            .find(|role| *role != Role::Logistics)
    }

    /// Check the structural invariants the generator relies on, so nothing
    /// can fail with out-of-range bookkeeping mid-generation.
    fn validate(&self) -> Result<()> {
        if self.roles[0] != Role::Vessel {
            return Err(ConfigError::NotVessel(self.roles[0]));
        }
        for (position, role) in self.roles.iter().enumerate().skip(1) {
            if *role == Role::Vessel {
                return Err(ConfigError::VesselNotOrigin { position });
            }
        }
        for (position, role) in self.roles.iter().enumerate() {
            if *role == Role::Retailer && position + 1 != self.roles.len() {
                return Err(ConfigError::RetailerNotTerminal { position });
            }
        }
        // A sale draws down the landed weight of its lot, so the lot must
        // come straight off a vessel.
        for (position, role) in self.roles.iter().enumerate().skip(1) {
            if *role == Role::Auction && self.roles[position - 1] != Role::Vessel {
                return Err(ConfigError::AuctionNotAfterVessel { position });
            }
        }
        self.check_cardinalities()
    }

    /// Dry-run the per-position lot counts the generator will produce and
    /// reject configurations whose fan-out bookkeeping cannot line up.
    fn check_cardinalities(&self) -> Result<()> {
        let (merge_point, merge_num) = self.merge_point().unwrap_or((0, 1));

        // Unconsumed lots available at each position's output.
        let mut avail = vec![0_usize; self.roles.len()];
        for _ in 0..merge_num {
            self.simulate_span(0, merge_point, &mut avail)?;
        }
        self.simulate_span(merge_point, self.roles.len(), &mut avail)?;
        Ok(())
    }

    fn simulate_span(&self, start: usize, end: usize, avail: &mut [usize]) -> Result<()> {
        for position in start..end {
            let role = self.roles[position];
            match role {
                Role::Vessel => avail[0] += 1,
                Role::Auction => {
                    self.require_customer(role, position)?;
                    if avail[position - 1] > 0 {
                        avail[position - 1] -= 1;
                    }
                    avail[position] += self.path_split_eff(position) as usize;
                }
                Role::Logistics => {
                    let produced = avail[position - 1];
                    let configured = (self.path_split_eff(position - 1)
                        * self.product_split_eff(position - 1))
                        as usize;
                    if configured != produced {
                        return Err(ConfigError::FanOutMismatch {
                            position,
                            configured,
                            produced,
                        });
                    }
                    avail[position - 1] = 0;
                    avail[position] += produced;
                }
                Role::Processor => {
                    self.require_customer(role, position)?;
                    avail[position - 1] = 0;
                    avail[position] += (self.product_split_eff(position)
                        * self.path_split_eff(position))
                        as usize;
                }
                Role::Distributor => {
                    self.require_customer(role, position)?;
                    let incoming = avail[position - 1];
                    avail[position - 1] = 0;
                    let lots = if self.merge_at(position) == 0
                        && self.product_split_at(position) == 0
                    {
                        incoming
                    } else {
                        1
                    };
                    avail[position] += lots * self.path_split_eff(position) as usize;
                }
                Role::Retailer => {
                    avail[position] += avail[position - 1];
                    avail[position - 1] = 0;
                }
            }
        }
        Ok(())
    }

    fn require_customer(&self, role: Role, position: usize) -> Result<()> {
        self.customer_role_after(position)
            .map(|_| ())
            .ok_or(ConfigError::MissingDownstream { role, position })
    }

    /// Reconstruct the digit strings for output file naming.
    pub fn pis_string(&self) -> String {
        self.roles.iter().map(Role::code).collect()
    }

    pub fn merge_string(&self) -> String {
        digits(&self.merge)
    }

    pub fn split_product_string(&self) -> String {
        digits(&self.split_product)
    }

    pub fn split_path_string(&self) -> String {
        digits(&self.split_path)
    }
}

fn parse_control(raw: &str, control: &'static str, expected: usize) -> Result<Vec<u32>> {
    if raw.len() != expected {
        return Err(ConfigError::LengthMismatch {
            control,
            got: raw.len(),
            expected,
        });
    }
    raw.chars()
        .enumerate()
        .map(|(position, code)| {
            code.to_digit(10).ok_or(ConfigError::InvalidControlDigit {
                control,
                code,
                position,
            })
        })
        .collect()
}

fn digits(values: &[u32]) -> String {
    values.iter().map(|value| value.to_string()).collect()
}
