//! Editor dialogs as explicit state machines. The page feeds them events
//! (trigger button, edit action, close controls, key presses) and submits.
use std::future::Future;

use crate::errors::ValidationError;
use crate::models::{ProfileForm, Service, ServiceForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseButton,
    Cancel,
    OutsideClick,
    EscapeKey,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalState<K, D> {
    Closed,
    OpenCreate { draft: D },
    OpenEdit { key: K, draft: D },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalEvent<K, D> {
    Trigger,
    Edit { key: K, draft: D },
    Close(CloseTrigger),
    KeyDown(String),
}

#[derive(Debug, PartialEq)]
pub enum SubmitError<E> {
    NotOpen,
    Rejected(E),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modal<K, D> {
    state: ModalState<K, D>,
}

pub type ServiceEditor = Modal<i64, ServiceForm>;
pub type ProfileEditor = Modal<(), ProfileForm>;

impl<K, D: Default> Default for Modal<K, D> {
    fn default() -> Self {
        Self { state: ModalState::Closed }
    }
}

impl<K, D: Default> Modal<K, D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ModalState<K, D> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, ModalState::Closed)
    }

    pub fn handle(&mut self, event: ModalEvent<K, D>) {
        match event {
            ModalEvent::Trigger => self.open_create(D::default()),
            ModalEvent::Edit { key, draft } => self.open_edit(key, draft),
            ModalEvent::Close(trigger) => {
                self.close(trigger);
            }
            ModalEvent::KeyDown(key) if key == "Escape" => {
                self.close(CloseTrigger::EscapeKey);
            }
            ModalEvent::KeyDown(_) => {}
        }
    }

    pub fn open_create(&mut self, draft: D) {
        self.state = ModalState::OpenCreate { draft };
    }

    pub fn open_edit(&mut self, key: K, draft: D) {
        self.state = ModalState::OpenEdit { key, draft };
    }

    /// Closes from any state and hands back the discarded draft, if any.
    pub fn close(&mut self, trigger: CloseTrigger) -> Option<D> {
        match std::mem::replace(&mut self.state, ModalState::Closed) {
            ModalState::Closed => None,
            ModalState::OpenCreate { draft } | ModalState::OpenEdit { draft, .. } => {
                tracing::debug!("Modal closed via {:?}, draft discarded", trigger);
                Some(draft)
            }
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match &mut self.state {
            ModalState::Closed => None,
            ModalState::OpenCreate { draft } | ModalState::OpenEdit { draft, .. } => Some(draft),
        }
    }

    /// Runs `commit` on a copy of the draft (with the edited key in edit
    /// mode). Success closes the modal; rejection leaves it open with the
    /// draft untouched.
    pub async fn submit<R, E, Fut>(
        &mut self,
        commit: impl FnOnce(Option<K>, D) -> Fut,
    ) -> Result<R, SubmitError<E>>
    where
        K: Clone,
        D: Clone,
        Fut: Future<Output = Result<R, E>>,
    {
        let pending = match &self.state {
            ModalState::Closed => return Err(SubmitError::NotOpen),
            ModalState::OpenCreate { draft } => commit(None, draft.clone()),
            ModalState::OpenEdit { key, draft } => commit(Some(key.clone()), draft.clone()),
        };
        match pending.await {
            Ok(value) => {
                self.state = ModalState::Closed;
                Ok(value)
            }
            Err(e) => Err(SubmitError::Rejected(e)),
        }
    }
}

const CLOSE_SCRIPT: &str = r#"<script>
  document.addEventListener('keydown', function (e) {
    if (e.key === 'Escape' && document.querySelector('.modal.open')) { window.location.href = '/profile'; }
  });
  document.querySelectorAll('.modal.open').forEach(function (modal) {
    modal.addEventListener('click', function (e) {
      if (e.target === modal) { window.location.href = '/profile'; }
    });
  });
</script>"#;

fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

fn text(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

pub fn render_service_modal(editor: &ServiceEditor) -> String {
    let (heading, action, draft) = match editor.state() {
        ModalState::Closed => return String::new(),
        ModalState::OpenCreate { draft } => ("List New Service", "/services".to_string(), draft),
        ModalState::OpenEdit { key, draft } => ("Edit Service", format!("/services/{}", key), draft),
    };

    format!(
        r#"<div class="modal open" id="serviceModal">
  <div class="modal-content">
    <a href="/profile" class="modal-close" id="modalClose" aria-label="Close">&times;</a>
    <h2>{heading}</h2>
    <form id="serviceForm" method="post" action="{action}">
      <label>Title <input id="serviceTitle" name="title" value="{title}"></label>
      <label>Category <input id="serviceCategory" name="category" value="{category}"></label>
      <label>Description <textarea id="serviceDescription" name="description">{description}</textarea></label>
      <label>Price (₹) <input id="servicePrice" name="price" inputmode="numeric" value="{price}"></label>
      <label>Delivery (days) <input id="serviceDelivery" name="delivery" inputmode="numeric" value="{delivery}"></label>
      <label>Image URL <input id="serviceImage" name="image" value="{image}"></label>
      <div class="modal-actions">
        <a href="/profile" class="btn-secondary" id="modalCancel">Cancel</a>
        <button type="submit" class="btn-primary">Save</button>
      </div>
    </form>
  </div>
</div>
{script}"#,
        heading = heading,
        action = action,
        title = attr(&draft.title),
        category = attr(&draft.category),
        description = text(&draft.description),
        price = attr(&draft.price),
        delivery = attr(&draft.delivery),
        image = attr(&draft.image),
        script = CLOSE_SCRIPT,
    )
}

fn field_error(errors: &[ValidationError], field: &str) -> String {
    match errors.iter().find(|e| e.field() == Some(field)) {
        Some(e) => format!(r#"<span class="field-error show">{}</span>"#, text(&e.to_string())),
        None => r#"<span class="field-error"></span>"#.to_string(),
    }
}

pub fn render_profile_modal(editor: &ProfileEditor, errors: &[ValidationError]) -> String {
    let draft = match editor.state() {
        ModalState::Closed => return String::new(),
        ModalState::OpenCreate { draft } | ModalState::OpenEdit { draft, .. } => draft,
    };

    format!(
        r#"<div class="modal open" id="editProfileModal">
  <div class="modal-content">
    <a href="/profile" class="modal-close" id="editModalClose" aria-label="Close">&times;</a>
    <h2>Edit Profile</h2>
    <form id="editProfileForm" method="post" action="/profile">
      <label>Avatar URL <input id="editAvatar" name="avatar" value="{avatar}"></label>
      <label>Name <input id="editName" name="name" value="{name}"></label>
      {name_error}
      <label>Email <input id="editEmail" name="email" value="{email}"></label>
      {email_error}
      <label>Bio <textarea id="editBio" name="bio">{bio}</textarea></label>
      <label>Skills (comma separated) <input id="editSkills" name="skills" value="{skills}"></label>
      <label>Location <input id="editLocation" name="location" value="{location}"></label>
      <div class="modal-actions">
        <a href="/profile" class="btn-secondary" id="editModalCancel">Cancel</a>
        <button type="submit" class="btn-primary">Save</button>
      </div>
    </form>
  </div>
</div>
{script}"#,
        avatar = attr(&draft.avatar),
        name = attr(&draft.name),
        name_error = field_error(errors, "name"),
        email = attr(&draft.email),
        email_error = field_error(errors, "email"),
        bio = text(&draft.bio),
        skills = attr(&draft.skills),
        location = attr(&draft.location),
        script = CLOSE_SCRIPT,
    )
}

pub fn render_delete_confirm(service: &Service) -> String {
    format!(
        r#"<div class="modal open" id="deleteConfirm">
  <div class="modal-content">
    <h2>Delete "{title}"?</h2>
    <p>{prompt}</p>
    <form method="post" action="/services/{id}/delete">
      <input type="hidden" name="confirm" value="yes">
      <div class="modal-actions">
        <a href="/profile" class="btn-secondary">Cancel</a>
        <button type="submit" class="delete-btn">Delete</button>
      </div>
    </form>
  </div>
</div>
{script}"#,
        title = text(&service.title),
        prompt = text(crate::services::catalog::DELETE_PROMPT),
        id = service.id,
        script = CLOSE_SCRIPT,
    )
}
