/// Capability level of whoever invoked a command.
///
/// Ordered so that `caller >= required` is the whole permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Anonymous,
    Sudo,
    Owner,
}

impl Role {
    /// Resolve the role of `user_id` given the configured owner and whether a
    /// sudo grant exists for them.
    pub fn resolve(user_id: u64, owner_id: u64, has_grant: bool) -> Self {
        if user_id == owner_id {
            Self::Owner
        } else if has_grant {
            Self::Sudo
        } else {
            Self::Anonymous
        }
    }

    pub fn allows(self, required: Role) -> bool {
        self >= required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_implicitly_sudo() {
        let role = Role::resolve(1, 1, false);
        assert_eq!(role, Role::Owner);
        assert!(role.allows(Role::Sudo));
        assert!(role.allows(Role::Anonymous));
    }

    #[test]
    fn grant_gives_sudo_but_not_owner() {
        let role = Role::resolve(2, 1, true);
        assert_eq!(role, Role::Sudo);
        assert!(role.allows(Role::Sudo));
        assert!(!role.allows(Role::Owner));
    }

    #[test]
    fn strangers_are_anonymous() {
        let role = Role::resolve(3, 1, false);
        assert_eq!(role, Role::Anonymous);
        assert!(!role.allows(Role::Sudo));
    }
}
