use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::lenient;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Earner,
    Buyer,
}

impl Role {
    pub fn is_seller(self) -> bool {
        matches!(self, Role::Earner)
    }
}

/// `earner` is a seller, any other non-empty role reads as a buyer.
fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::text(deserializer)?
        .filter(|role| !role.is_empty())
        .map(|role| if role == "earner" { Role::Earner } else { Role::Buyer }))
}

/// The signed-in user as stored under the `user` key.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct User {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_role", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    // Whatever else the auth API sent (ids, category, timestamps)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn is_seller(&self) -> bool {
        self.role.map_or(false, Role::is_seller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_api_user_and_keeps_unknown_fields() {
        let user: User = serde_json::from_str(
            r#"{"_id":"abc","name":"Asha Rao","email":"a@b.co","role":"earner",
                "skills":["Logo","SEO"],"category":"design"}"#,
        )
        .unwrap();
        assert_eq!(user.name.as_deref(), Some("Asha Rao"));
        assert!(user.is_seller());
        assert_eq!(user.skills, vec!["Logo", "SEO"]);
        assert_eq!(user.extra["_id"], "abc");

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["category"], "design");
        assert_eq!(back["role"], "earner");
    }

    #[test]
    fn odd_shapes_degrade_instead_of_failing() {
        let user: User = serde_json::from_str(
            r#"{"name":"Ravi","phone":9876543210,"skills":"rust","role":"admin","bio":null}"#,
        )
        .unwrap();
        assert_eq!(user.phone.as_deref(), Some("9876543210"));
        assert!(user.skills.is_empty());
        assert_eq!(user.role, Some(Role::Buyer));
        assert_eq!(user.bio, None);
    }

    #[test]
    fn empty_role_is_no_role() {
        let user: User = serde_json::from_str(r#"{"name":"Ravi","role":""}"#).unwrap();
        assert_eq!(user.role, None);
        assert!(!user.is_seller());
    }
}
