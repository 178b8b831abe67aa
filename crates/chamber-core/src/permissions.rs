//! Role based capability table.
//!
//! Every [`Role`] has exactly one [`Permissions`] row. Lookups go through an
//! exhaustive `match`, so a role without a row does not compile; free-form
//! role strings are rejected when they are parsed into a [`Role`].

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{
  Deserialize,
  Serialize
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Superadmin,
  Board,
  Staff,
  Member
}

impl Role {
  pub const ALL: [Role; 4] = [
    Role::Superadmin,
    Role::Board,
    Role::Staff,
    Role::Member
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Role::Superadmin => "superadmin",
      | Role::Board => "board",
      | Role::Staff => "staff",
      | Role::Member => "member"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Role::Superadmin => {
        "Super admin"
      }
      | Role::Board => "Board",
      | Role::Staff => "Staff",
      | Role::Member => "Member"
    }
  }
}

impl fmt::Display for Role {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let lower =
      s.trim().to_ascii_lowercase();
    Role::ALL
      .into_iter()
      .find(|role| {
        role.as_str() == lower
      })
      .ok_or_else(|| {
        anyhow!("unknown role: {s}")
      })
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
  Create,
  Read,
  Update,
  Delete,
  Comment
}

impl Capability {
  pub const ALL: [Capability; 5] = [
    Capability::Create,
    Capability::Read,
    Capability::Update,
    Capability::Delete,
    Capability::Comment
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Capability::Create => "create",
      | Capability::Read => "read",
      | Capability::Update => "update",
      | Capability::Delete => "delete",
      | Capability::Comment => "comment"
    }
  }
}

impl fmt::Display for Capability {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Capability {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let lower =
      s.trim().to_ascii_lowercase();
    Capability::ALL
      .into_iter()
      .find(|cap| cap.as_str() == lower)
      .ok_or_else(|| {
        anyhow!(
          "unknown capability: {s}"
        )
      })
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct Permissions {
  pub create:  bool,
  pub read:    bool,
  pub update:  bool,
  pub delete:  bool,
  pub comment: bool
}

impl Permissions {
  pub fn allows(
    &self,
    capability: Capability
  ) -> bool {
    match capability {
      | Capability::Create => {
        self.create
      }
      | Capability::Read => self.read,
      | Capability::Update => {
        self.update
      }
      | Capability::Delete => {
        self.delete
      }
      | Capability::Comment => {
        self.comment
      }
    }
  }

  pub fn granted(
    &self
  ) -> impl Iterator<Item = Capability> + '_
  {
    Capability::ALL
      .into_iter()
      .filter(|cap| self.allows(*cap))
  }
}

const SUPERADMIN: Permissions =
  Permissions {
    create:  true,
    read:    true,
    update:  true,
    delete:  true,
    comment: true
  };

const BOARD: Permissions = Permissions {
  create:  true,
  read:    true,
  update:  true,
  delete:  false,
  comment: true
};

const STAFF: Permissions = Permissions {
  create:  true,
  read:    true,
  update:  true,
  delete:  false,
  comment: true
};

const MEMBER: Permissions = Permissions {
  create:  false,
  read:    true,
  update:  false,
  delete:  false,
  comment: true
};

/// Granted to users whose role is not recognised.
pub const NO_ACCESS: Permissions =
  Permissions {
    create:  false,
    read:    false,
    update:  false,
    delete:  false,
    comment: false
  };

/// The process-wide table, in [`Role::ALL`] order.
pub const PERMISSIONS: [(
  Role,
  Permissions
); 4] = [
  (Role::Superadmin, SUPERADMIN),
  (Role::Board, BOARD),
  (Role::Staff, STAFF),
  (Role::Member, MEMBER)
];

pub const fn permissions_for(
  role: Role
) -> Permissions {
  match role {
    | Role::Superadmin => SUPERADMIN,
    | Role::Board => BOARD,
    | Role::Staff => STAFF,
    | Role::Member => MEMBER
  }
}

pub fn role_allows(
  role: Role,
  capability: Capability
) -> bool {
  permissions_for(role)
    .allows(capability)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn superadmin_can_delete_and_member_cannot()
  {
    assert!(
      permissions_for(Role::Superadmin)
        .delete
    );
    assert!(
      !permissions_for(Role::Member)
        .delete
    );
  }

  #[test]
  fn table_has_one_row_per_role_matching_lookup()
  {
    assert_eq!(
      PERMISSIONS.len(),
      Role::ALL.len()
    );
    for (idx, (role, perms)) in
      PERMISSIONS.iter().enumerate()
    {
      assert_eq!(*role, Role::ALL[idx]);
      assert_eq!(
        *perms,
        permissions_for(*role)
      );
    }
  }

  #[test]
  fn every_role_can_read() {
    for role in Role::ALL {
      assert!(role_allows(
        role,
        Capability::Read
      ));
    }
  }

  #[test]
  fn parses_roles_case_insensitively() {
    assert_eq!(
      "Board"
        .parse::<Role>()
        .expect("board"),
      Role::Board
    );
    assert!(
      "treasurer"
        .parse::<Role>()
        .is_err()
    );
  }

  #[test]
  fn granted_lists_only_allowed_capabilities()
  {
    let member: Vec<_> =
      permissions_for(Role::Member)
        .granted()
        .collect();
    assert_eq!(member, vec![
      Capability::Read,
      Capability::Comment
    ]);
  }
}
