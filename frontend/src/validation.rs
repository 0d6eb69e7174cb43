//! 表单校验
//!
//! 每个表单的 `validate` 一次性返回全部字段错误，成功时给出可直接提交的值。

use adfluencer_shared::Role;
use adfluencer_shared::protocol::{CreateCampaignRequest, LoginRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// 查找某个字段的第一条错误（用于在输入框下方展示）
pub fn error_for(errors: &[FieldError], field: &str) -> Option<&'static str> {
    errors.iter().find(|e| e.field == field).map(|e| e.message)
}

fn finish<T>(errors: Vec<FieldError>, value: impl FnOnce() -> T) -> Result<T, Vec<FieldError>> {
    if errors.is_empty() {
        Ok(value())
    } else {
        Err(errors)
    }
}

/// 粗略的邮箱格式检查：`local@domain.tld`，不含空白
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

fn check_email(errors: &mut Vec<FieldError>, email: &str) {
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Enter a valid email address"));
    }
}

// =========================================================
// 登录
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, Vec<FieldError>> {
        let email = self.email.trim();
        let mut errors = Vec::new();
        check_email(&mut errors, email);
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        finish(errors, || LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

// =========================================================
// 注册
// =========================================================

const MIN_USERNAME_LEN: usize = 3;
const MAX_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub role: Option<Role>,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// 原始输入，留空表示未填写
    pub follower_count: String,
    pub category: String,
}

/// 校验通过的注册信息
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub follower_count: Option<u64>,
    pub category: Option<String>,
}

impl SignupForm {
    pub fn validate(&self) -> Result<Registration, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.role.is_none() {
            errors.push(FieldError::new("role", "Choose an account type"));
        }

        let username = self.username.trim();
        if username.is_empty() {
            errors.push(FieldError::new("username", "Username is required"));
        } else if username.chars().count() < MIN_USERNAME_LEN {
            errors.push(FieldError::new(
                "username",
                "Username must be at least 3 characters",
            ));
        }

        let email = self.email.trim();
        check_email(&mut errors, email);

        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        } else if self.password.chars().count() > MAX_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                "Password must be at most 8 characters",
            ));
        }

        if self.confirm_password.is_empty() {
            errors.push(FieldError::new(
                "confirm_password",
                "Please confirm your password",
            ));
        } else if self.confirm_password != self.password {
            errors.push(FieldError::new("confirm_password", "Passwords do not match"));
        }

        let follower_text = self.follower_count.trim();
        let follower_count = if follower_text.is_empty() {
            None
        } else {
            match follower_text.parse::<u64>() {
                Ok(count) => Some(count),
                Err(_) => {
                    let message = if follower_text.parse::<i64>().is_ok() {
                        "Follower count cannot be negative"
                    } else {
                        "Follower count must be a whole number"
                    };
                    errors.push(FieldError::new("follower_count", message));
                    None
                }
            }
        };

        let category = Some(self.category.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        match self.role {
            Some(role) if errors.is_empty() => Ok(Registration {
                username: username.to_string(),
                email: email.to_string(),
                password: self.password.clone(),
                role,
                follower_count,
                category,
            }),
            _ => Err(errors),
        }
    }
}

// =========================================================
// 资料编辑
// =========================================================

/// 资料编辑表单；创作者额外维护类别与粉丝数
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileForm {
    pub role: Role,
    pub username: String,
    pub email: String,
    pub category: String,
    pub follower_count: String,
}

/// 校验通过的资料更新
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub category: Option<String>,
    pub follower_count: Option<u64>,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<ProfileUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.push(FieldError::new("username", "Username is required"));
        }
        let email = self.email.trim();
        check_email(&mut errors, email);

        let (category, follower_count) = match self.role {
            Role::Advertiser => (None, None),
            Role::ContentCreator => {
                let category = self.category.trim();
                if category.is_empty() {
                    errors.push(FieldError::new("category", "Choose a category"));
                }
                let follower_text = self.follower_count.trim();
                let count = if follower_text.is_empty() {
                    errors.push(FieldError::new(
                        "follower_count",
                        "Follower count is required",
                    ));
                    None
                } else if let Ok(count) = follower_text.parse::<u64>() {
                    Some(count)
                } else {
                    errors.push(FieldError::new(
                        "follower_count",
                        "Follower count must be a whole number",
                    ));
                    None
                };
                (Some(category.to_string()), count)
            }
        };

        finish(errors, || ProfileUpdate {
            username: username.to_string(),
            email: email.to_string(),
            category,
            follower_count,
        })
    }
}

// =========================================================
// 创建活动
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignForm {
    pub title: String,
    pub description: String,
    pub budget: String,
    pub max_capacity: String,
}

impl CampaignForm {
    pub fn validate(&self) -> Result<CreateCampaignRequest, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        let description = self.description.trim();
        if description.is_empty() {
            errors.push(FieldError::new("description", "Description is required"));
        }

        let budget = match self.budget.trim().parse::<f64>() {
            Ok(b) if b.is_finite() && b > 0.0 => b,
            Ok(_) => {
                errors.push(FieldError::new("budget", "Budget must be greater than 0"));
                0.0
            }
            Err(_) => {
                errors.push(FieldError::new("budget", "Budget is required"));
                0.0
            }
        };

        let max_capacity = match self.max_capacity.trim().parse::<i64>() {
            Ok(c) if c >= 1 => u32::try_from(c).unwrap_or(u32::MAX),
            Ok(_) => {
                errors.push(FieldError::new(
                    "max_capacity",
                    "At least one creator is required",
                ));
                0
            }
            Err(_) => {
                errors.push(FieldError::new(
                    "max_capacity",
                    "Maximum capacity is required",
                ));
                0
            }
        };

        finish(errors, || CreateCampaignRequest {
            title: title.to_string(),
            description: description.to_string(),
            budget,
            max_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("ayse@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.co"));
        for bad in ["", "plain", "@example.com", "a@b", "a@.com", "a@b.", "a b@c.com", "a@b@c.com"] {
            assert!(!is_valid_email(bad), "{bad}");
        }
    }

    #[test]
    fn login_requires_email_and_password() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(fields(&errors), ["email", "password"]);

        let errors = LoginForm {
            email: "nope".into(),
            password: "x".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(error_for(&errors, "email"), Some("Enter a valid email address"));

        let request = LoginForm {
            email: "  a@b.co ".into(),
            password: " pw ".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(request.email, "a@b.co");
        assert_eq!(request.password, " pw ");
    }

    fn signup() -> SignupForm {
        SignupForm {
            role: Some(Role::ContentCreator),
            username: "ayse".into(),
            email: "ayse@example.com".into(),
            password: "secret".into(),
            confirm_password: "secret".into(),
            follower_count: String::new(),
            category: String::new(),
        }
    }

    #[test]
    fn signup_accepts_a_complete_form() {
        let registration = signup().validate().unwrap();
        assert_eq!(registration.role, Role::ContentCreator);
        assert_eq!(registration.follower_count, None);
        assert_eq!(registration.category, None);

        let registration = SignupForm {
            follower_count: " 1500 ".into(),
            category: "Beauty".into(),
            ..signup()
        }
        .validate()
        .unwrap();
        assert_eq!(registration.follower_count, Some(1500));
        assert_eq!(registration.category.as_deref(), Some("Beauty"));
    }

    #[test]
    fn signup_reports_every_broken_field() {
        let errors = SignupForm {
            role: None,
            username: "ab".into(),
            email: "x".into(),
            password: "toolongpw".into(),
            confirm_password: "other".into(),
            follower_count: "-3".into(),
            category: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            fields(&errors),
            ["role", "username", "email", "password", "confirm_password", "follower_count"]
        );
    }

    #[test]
    fn signup_password_limit_is_inclusive() {
        let form = SignupForm {
            password: "12345678".into(),
            confirm_password: "12345678".into(),
            ..signup()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn campaign_budget_and_capacity_bounds() {
        let form = CampaignForm {
            title: "Launch".into(),
            description: "Spring launch".into(),
            budget: "2500".into(),
            max_capacity: "3".into(),
        };
        let request = form.validate().unwrap();
        assert_eq!(request.budget, 2500.0);
        assert_eq!(request.max_capacity, 3);

        let errors = CampaignForm {
            budget: "0".into(),
            max_capacity: "0".into(),
            ..form.clone()
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(&errors), ["budget", "max_capacity"]);

        let errors = CampaignForm::default().validate().unwrap_err();
        assert_eq!(
            fields(&errors),
            ["title", "description", "budget", "max_capacity"]
        );
    }

    #[test]
    fn profile_extra_fields_only_apply_to_creators() {
        let advertiser = ProfileForm {
            role: Role::Advertiser,
            username: " Acme ".into(),
            email: "team@acme.com".into(),
            category: String::new(),
            follower_count: "junk".into(),
        };
        let update = advertiser.validate().unwrap();
        assert_eq!(update.username, "Acme");
        assert_eq!((update.category, update.follower_count), (None, None));

        let creator = ProfileForm {
            role: Role::ContentCreator,
            ..advertiser.clone()
        };
        let errors = creator.validate().unwrap_err();
        assert_eq!(fields(&errors), ["category", "follower_count"]);

        let update = ProfileForm {
            category: "Food".into(),
            follower_count: "1200".into(),
            ..creator
        }
        .validate()
        .unwrap();
        assert_eq!(update.category.as_deref(), Some("Food"));
        assert_eq!(update.follower_count, Some(1200));
    }
}
