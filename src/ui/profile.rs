use crate::models::{Order, Service, User};
use super::layout::fill_template;

const DEFAULT_NAME: &str = "User";
const DEFAULT_BIO: &str = "No bio added yet";
const NOT_PROVIDED: &str = "Not provided";

/// Up to two uppercase initials from the first two name tokens; "U" for no name.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if letters.is_empty() {
        "U".to_string()
    } else {
        letters
    }
}

/// Avatar hue: first UTF-16 unit of the name modulo 360.
pub fn avatar_hue(name: &str) -> u32 {
    let source = if name.is_empty() { "U" } else { name };
    source.encode_utf16().next().map_or(0, |unit| u32::from(unit) % 360)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleBadge {
    pub label: &'static str,
    pub class: &'static str,
}

/// Everything the profile header shows, with fallbacks already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub name: String,
    pub initials: String,
    pub hue: u32,
    pub role_badge: Option<RoleBadge>,
    pub bio: String,
    pub email: String,
    pub location: String,
    pub skills: Vec<String>,
    pub seller: bool,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl ProfileView {
    pub fn from_user(user: &User) -> Self {
        let name = non_blank(&user.name).unwrap_or(DEFAULT_NAME);
        let seller = user.is_seller();
        let role_badge = user.role.map(|_| {
            if seller {
                RoleBadge { label: "Service Provider", class: "seller" }
            } else {
                RoleBadge { label: "Buyer", class: "buyer" }
            }
        });

        Self {
            name: name.to_string(),
            initials: initials(user.name.as_deref().unwrap_or("")),
            hue: avatar_hue(user.name.as_deref().unwrap_or("")),
            role_badge,
            bio: non_blank(&user.bio).unwrap_or(DEFAULT_BIO).to_string(),
            email: non_blank(&user.email).unwrap_or(NOT_PROVIDED).to_string(),
            location: non_blank(&user.location).unwrap_or(NOT_PROVIDED).to_string(),
            skills: user
                .skills
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            seller,
        }
    }
}

fn text(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

fn render_role_badge(badge: Option<RoleBadge>) -> String {
    match badge {
        Some(badge) => format!(
            r#"<span class="role-badge {}" id="roleBadge">{}</span>"#,
            badge.class, badge.label
        ),
        None => String::new(),
    }
}

fn render_skills(skills: &[String]) -> String {
    if skills.is_empty() {
        return r#"<p class="text-muted">No skills added yet</p>"#.to_string();
    }
    skills
        .iter()
        .map(|skill| format!(r#"<span class="skill-tag">{}</span>"#, text(skill)))
        .collect::<Vec<_>>()
        .join("")
}

/// Fills the profile template with the header fields and the given section.
pub fn render_profile(template: &str, view: &ProfileView, section: &str, modals: &str) -> String {
    let hue = view.hue.to_string();
    fill_template(
        template,
        &[
            ("profile_name", &text(&view.name)),
            ("avatar_initials", &text(&view.initials)),
            ("avatar_hue", &hue),
            ("role_badge", &render_role_badge(view.role_badge)),
            ("bio", &text(&view.bio)),
            ("contact_email", &text(&view.email)),
            ("contact_location", &text(&view.location)),
            ("skills", &render_skills(&view.skills)),
            ("role_section", section),
            ("modals", modals),
        ],
    )
}

fn render_service_card(service: &Service) -> String {
    let image = match service.image.as_deref() {
        Some(src) => format!(
            r#"<img src="{}" alt="{}" class="service-card-image">"#,
            attr(src),
            attr(&service.title)
        ),
        None => r#"<div class="service-card-image placeholder"></div>"#.to_string(),
    };
    format!(
        r#"<div class="service-card">
  {image}
  <div class="service-card-content">
    <h3 class="service-card-title">{title}</h3>
    <div class="service-card-price">₹{price}</div>
    <div class="service-card-delivery">{delivery} days delivery</div>
    <div class="service-card-actions">
      <a class="edit-btn" href="/profile?modal=service&amp;edit={id}">Edit</a>
      <a class="delete-btn" href="/profile?confirm_delete={id}">Delete</a>
    </div>
  </div>
</div>"#,
        image = image,
        title = text(&service.title),
        price = service.price,
        delivery = service.delivery,
        id = service.id,
    )
}

pub fn render_seller_section(services: &[Service]) -> String {
    let body = if services.is_empty() {
        r#"<div class="empty-state" id="noServices">
    <p>You haven't listed any services yet.</p>
    <a class="btn-primary" id="listNewServiceBtn2" href="/profile?modal=service">List your first service</a>
  </div>"#
            .to_string()
    } else {
        let cards = services.iter().map(render_service_card).collect::<Vec<_>>().join("\n");
        format!(r#"<div class="services-grid" id="servicesGrid">{}</div>"#, cards)
    };

    format!(
        r#"<section class="seller-section" id="sellerSection">
  <div class="section-header">
    <h2>My Services <span class="stat" id="servicesCount">{count}</span></h2>
    <a class="btn-primary" id="listNewServiceBtn" href="/profile?modal=service">List New Service</a>
  </div>
  {body}
</section>"#,
        count = services.len(),
        body = body,
    )
}

fn render_order_card(order: &Order) -> String {
    let status = order.status_or_pending();
    format!(
        r#"<div class="order-card">
  <div class="order-info">
    <h3>{service}</h3>
    <p>Order ID: {id} • By {seller}</p>
  </div>
  <span class="order-status {class}">{badge}</span>
</div>"#,
        service = text(order.service_name.as_deref().unwrap_or("Service")),
        id = text(order.id.as_deref().unwrap_or("N/A")),
        seller = text(order.seller_name.as_deref().unwrap_or("Unknown")),
        class = attr(status),
        badge = text(&status.to_uppercase()),
    )
}

pub fn render_buyer_section(orders: &[Order]) -> String {
    let body = if orders.is_empty() {
        r#"<div class="empty-state" id="noOrders"><p>No orders yet.</p></div>"#.to_string()
    } else {
        let cards = orders.iter().map(render_order_card).collect::<Vec<_>>().join("\n");
        format!(r#"<div class="buyer-orders" id="buyerOrders">{}</div>"#, cards)
    };

    format!(
        r#"<section class="buyer-section" id="buyerSection">
  <div class="section-header"><h2>My Orders</h2></div>
  {}
</section>"#,
        body
    )
}
