use serde::{Deserialize, Serialize};

/// Participant role at one position of a supply-chain path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Vessel,
    Auction,
    Logistics,
    Processor,
    Distributor,
    Retailer,
}

impl Role {
    /// All roles, in ascending code order.
    pub const ALL: [Role; 6] = [
        Role::Vessel,
        Role::Auction,
        Role::Logistics,
        Role::Processor,
        Role::Distributor,
        Role::Retailer,
    ];

    /// Parse a single digit code ('1'..='6') into a role.
    pub fn from_code(code: char) -> Option<Role> {
        match code {
            '1' => Some(Role::Vessel),
            '2' => Some(Role::Auction),
            '3' => Some(Role::Logistics),
            '4' => Some(Role::Processor),
            '5' => Some(Role::Distributor),
            '6' => Some(Role::Retailer),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Role::Vessel => '1',
            Role::Auction => '2',
            Role::Logistics => '3',
            Role::Processor => '4',
            Role::Distributor => '5',
            Role::Retailer => '6',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Vessel => "vessel",
            Role::Auction => "auction",
            Role::Logistics => "logistics",
            Role::Processor => "processing",
            Role::Distributor => "wholesaler",
            Role::Retailer => "retailer",
        }
    }

    /// Index into per-role tables (pools, locations).
    pub fn index(&self) -> usize {
        match self {
            Role::Vessel => 0,
            Role::Auction => 1,
            Role::Logistics => 2,
            Role::Processor => 3,
            Role::Distributor => 4,
            Role::Retailer => 5,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
