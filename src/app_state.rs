use crate::commands::AppCommand;
use crate::config::ClientConfig;
use crate::error::EntryError;
use crate::school::validation::{entry_is_invalid, is_digit_input, relevant_class_data, validate_form};
use crate::school::{ClassEntry, ClassNumber, FormDataMap, SchoolCategory, SchoolDetails, SubmitPayload};
use crossterm::event::KeyCode;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// 成功提示自动消失的时间
const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(5);

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ClassField {
    Enrolled,
    Appeared,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum FocusField {
    Udise,
    Class(ClassNumber, ClassField),
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum BannerKind {
    Error,
    Success,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    pub expires_at: Option<Instant>,
}

#[derive(Debug)]
pub enum AppEvent {
    Log(String),
    SchoolLoaded(SchoolDetails),
    LookupFailed(EntryError),
    Submitted(String),
    SubmitFailed(EntryError),
}

pub struct App {
    pub config: ClientConfig,
    pub udise_input: String,
    pub school: Option<SchoolDetails>,
    pub form: FormDataMap,
    pub loading: bool,
    pub banner: Option<Banner>,
    pub focus: FocusField,
    pub log_messages: Vec<String>,
    pub cmd_tx: mpsc::UnboundedSender<AppCommand>,
    pub evt_rx: Option<mpsc::UnboundedReceiver<AppEvent>>,
}

impl App {
    pub fn new(
        config: ClientConfig,
        startup_info: Vec<String>,
        cmd_tx: mpsc::UnboundedSender<AppCommand>,
        evt_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> App {
        let mut log_messages = vec!["应用已启动".to_string()];
        log_messages.extend(startup_info);

        App {
            config,
            udise_input: String::new(),
            school: None,
            form: FormDataMap::new(),
            loading: false,
            banner: None,
            focus: FocusField::Udise,
            log_messages,
            cmd_tx,
            evt_rx: Some(evt_rx),
        }
    }

    pub fn category(&self) -> Option<SchoolCategory> {
        self.school.as_ref().map(|s| s.category())
    }

    /// 当前学校需要录入的年级
    pub fn relevant_classes(&self) -> &'static [ClassNumber] {
        self.category().map(|c| c.classes()).unwrap_or(&[])
    }

    pub fn is_update_mode(&self) -> bool {
        self.school
            .as_ref()
            .map(|s| s.existing_data.is_some())
            .unwrap_or(false)
    }

    pub fn class_value(&self, cls: ClassNumber, field: ClassField) -> &str {
        match self.form.get(&cls) {
            Some(entry) => match field {
                ClassField::Enrolled => &entry.enrolled,
                ClassField::Appeared => &entry.appeared,
            },
            None => "",
        }
    }

    pub fn class_is_invalid(&self, cls: ClassNumber) -> bool {
        self.form.get(&cls).map(entry_is_invalid).unwrap_or(false)
    }

    fn show_error(&mut self, text: impl Into<String>) {
        self.banner = Some(Banner {
            kind: BannerKind::Error,
            text: text.into(),
            expires_at: None,
        });
    }

    fn show_success(&mut self, text: impl Into<String>, ttl: Option<Duration>) {
        self.banner = Some(Banner {
            kind: BannerKind::Success,
            text: text.into(),
            expires_at: ttl.map(|d| Instant::now() + d),
        });
    }

    /// 过期的提示条清掉
    pub fn tick(&mut self, now: Instant) {
        if let Some(Banner {
            expires_at: Some(at),
            ..
        }) = self.banner
        {
            if now >= at {
                self.banner = None;
            }
        }
    }

    /// 发起查询。请求进行中时忽略
    pub fn request_lookup(&mut self) {
        if self.loading {
            return;
        }
        let udise = self.udise_input.trim().to_string();
        if udise.is_empty() {
            return;
        }
        if let Err(e) = self.config.ensure_configured() {
            self.show_error(e.to_string());
            return;
        }

        self.loading = true;
        self.banner = None;
        self.school = None;
        self.form.clear();
        let _ = self.cmd_tx.send(AppCommand::Lookup { udise });
    }

    /// 本地校验通过后提交。请求进行中时忽略
    pub fn request_submit(&mut self) {
        if self.loading {
            return;
        }
        let Some(school) = self.school.as_ref() else {
            return;
        };
        let category = school.category();
        if let Err(e) = validate_form(&category, &self.form) {
            self.show_error(e.to_string());
            return;
        }
        if let Err(e) = self.config.ensure_configured() {
            self.show_error(e.to_string());
            return;
        }

        let payload = SubmitPayload {
            udise: school.udise.clone(),
            name: school.name.clone(),
            panchayat: school.panchayat.clone(),
            school_type: school.school_type.clone(),
            class_data: relevant_class_data(&category, &self.form),
        };
        self.loading = true;
        self.banner = None;
        let _ = self.cmd_tx.send(AppCommand::Submit { payload });
    }

    /// 只接受数字；返回是否写入
    pub fn set_class_value(&mut self, cls: ClassNumber, field: ClassField, value: String) -> bool {
        if !is_digit_input(&value) {
            return false;
        }
        let entry = self.form.entry(cls).or_insert_with(ClassEntry::default);
        match field {
            ClassField::Enrolled => entry.enrolled = value,
            ClassField::Appeared => entry.appeared = value,
        }
        true
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Log(msg) => self.log_messages.push(msg),
            AppEvent::SchoolLoaded(details) => {
                self.loading = false;
                self.form = details.existing_data.clone().unwrap_or_default();
                let category = details.category();
                if let SchoolCategory::Unknown(raw) = &category {
                    self.show_error(format!("Unsupported school type '{}'.", raw));
                } else if details.existing_data.is_some() {
                    self.show_success("Existing data found. Mode: Update", None);
                } else {
                    self.banner = None;
                }
                self.focus = category
                    .classes()
                    .first()
                    .map(|c| FocusField::Class(*c, ClassField::Enrolled))
                    .unwrap_or(FocusField::Udise);
                self.school = Some(details);
            }
            AppEvent::LookupFailed(e) => {
                self.loading = false;
                self.show_error(e.to_string());
            }
            AppEvent::Submitted(message) => {
                self.loading = false;
                self.show_success(message, Some(SUCCESS_BANNER_TTL));
                // 提交成功后当前表单就是已保存的数据
                if let Some(school) = self.school.as_mut() {
                    school.existing_data = Some(self.form.clone());
                }
            }
            AppEvent::SubmitFailed(e) => {
                self.loading = false;
                self.show_error(e.to_string());
            }
        }
    }

    /// 焦点顺序：UDISE 输入框，然后每个年级的报名、参考
    fn focus_order(&self) -> Vec<FocusField> {
        let mut order = vec![FocusField::Udise];
        for cls in self.relevant_classes() {
            order.push(FocusField::Class(*cls, ClassField::Enrolled));
            order.push(FocusField::Class(*cls, ClassField::Appeared));
        }
        order
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    /// 返回 true 表示退出
    pub fn handle_key_event(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::F(2) => self.request_submit(),
            KeyCode::Enter => match self.focus {
                FocusField::Udise => self.request_lookup(),
                FocusField::Class(..) => self.move_focus(true),
            },
            KeyCode::Backspace => match self.focus {
                FocusField::Udise => {
                    self.udise_input.pop();
                }
                FocusField::Class(cls, field) => {
                    let mut value = self.class_value(cls, field).to_string();
                    value.pop();
                    self.set_class_value(cls, field, value);
                }
            },
            KeyCode::Char(c) => match self.focus {
                FocusField::Udise => self.udise_input.push(c),
                FocusField::Class(cls, field) => {
                    let mut value = self.class_value(cls, field).to_string();
                    value.push(c);
                    self.set_class_value(cls, field, value);
                }
            },
            _ => {}
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(endpoint: &str) -> (App, mpsc::UnboundedReceiver<AppCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (_evt_tx, evt_rx) = mpsc::unbounded_channel();
        let cfg = ClientConfig {
            endpoint_url: endpoint.to_string(),
        };
        (App::new(cfg, Vec::new(), cmd_tx, evt_rx), cmd_rx)
    }

    fn details(school_type: &str, existing: Option<FormDataMap>) -> SchoolDetails {
        SchoolDetails {
            udise: "9050300106".into(),
            name: "PS Rampur".into(),
            panchayat: "Rampur".into(),
            school_type: school_type.into(),
            existing_data: existing,
        }
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key_event(KeyCode::Char(c));
        }
    }

    #[test]
    fn placeholder_endpoint_blocks_lookup() {
        let (mut app, mut rx) = app(crate::config::PLACEHOLDER_ENDPOINT);
        type_str(&mut app, "9050300106");
        app.handle_key_event(KeyCode::Enter);
        assert!(rx.try_recv().is_err());
        assert!(!app.loading);
        assert_eq!(app.banner.unwrap().kind, BannerKind::Error);
    }

    #[test]
    fn lookup_is_sent_once_while_loading() {
        let (mut app, mut rx) = app("http://localhost:8080/");
        type_str(&mut app, " 9050300106 ");
        app.handle_key_event(KeyCode::Enter);
        app.handle_key_event(KeyCode::Enter);
        match rx.try_recv() {
            Ok(AppCommand::Lookup { udise }) => assert_eq!(udise, "9050300106"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(rx.try_recv().is_err());
        assert!(app.loading);
    }

    #[test]
    fn loaded_school_prefills_existing_data() {
        let (mut app, _rx) = app("http://localhost:8080/");
        let mut existing = FormDataMap::new();
        existing.insert(1, ClassEntry::new("50", "45"));
        app.loading = true;
        app.apply_event(AppEvent::SchoolLoaded(details("PS", Some(existing))));
        assert!(!app.loading);
        assert!(app.is_update_mode());
        assert_eq!(app.class_value(1, ClassField::Appeared), "45");
        assert_eq!(app.focus, FocusField::Class(1, ClassField::Enrolled));
        assert_eq!(app.relevant_classes(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn non_digit_keys_are_ignored_in_class_fields() {
        let (mut app, _rx) = app("http://localhost:8080/");
        app.apply_event(AppEvent::SchoolLoaded(details("UPS", None)));
        type_str(&mut app, "4x2");
        assert_eq!(app.class_value(6, ClassField::Enrolled), "42");
        app.handle_key_event(KeyCode::Backspace);
        assert_eq!(app.class_value(6, ClassField::Enrolled), "4");
    }

    #[test]
    fn invalid_form_is_not_submitted() {
        let (mut app, mut rx) = app("http://localhost:8080/");
        app.apply_event(AppEvent::SchoolLoaded(details("PS", None)));
        app.set_class_value(2, ClassField::Enrolled, "10".into());
        app.set_class_value(2, ClassField::Appeared, "12".into());
        assert!(app.class_is_invalid(2));
        app.handle_key_event(KeyCode::F(2));
        assert!(rx.try_recv().is_err());
        assert_eq!(
            app.banner.as_ref().unwrap().text,
            "Class 2: Appeared cannot be greater than Enrolled."
        );
    }

    #[test]
    fn submit_sends_only_relevant_classes() {
        let (mut app, mut rx) = app("http://localhost:8080/");
        let mut existing = FormDataMap::new();
        existing.insert(7, ClassEntry::new("9", "9"));
        existing.insert(1, ClassEntry::new("50", "45"));
        app.apply_event(AppEvent::SchoolLoaded(details("PS", Some(existing))));
        app.handle_key_event(KeyCode::F(2));
        match rx.try_recv() {
            Ok(AppCommand::Submit { payload }) => {
                assert_eq!(payload.class_data.len(), 1);
                assert!(payload.class_data.contains_key(&1));
                assert_eq!(payload.school_type, "PS");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_school_type_is_reported_and_blocks_submit() {
        let (mut app, mut rx) = app("http://localhost:8080/");
        app.apply_event(AppEvent::SchoolLoaded(details("KGBV", None)));
        assert_eq!(app.banner.as_ref().unwrap().kind, BannerKind::Error);
        assert_eq!(app.focus, FocusField::Udise);
        app.handle_key_event(KeyCode::F(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn successful_submit_switches_to_update_mode_and_expires() {
        let (mut app, _rx) = app("http://localhost:8080/");
        app.apply_event(AppEvent::SchoolLoaded(details("PS", None)));
        app.set_class_value(1, ClassField::Enrolled, "50".into());
        app.loading = true;
        app.apply_event(AppEvent::Submitted("Data saved successfully".into()));
        assert!(!app.loading);
        assert!(app.is_update_mode());
        assert_eq!(app.banner.as_ref().unwrap().kind, BannerKind::Success);

        app.tick(Instant::now() + Duration::from_secs(6));
        assert!(app.banner.is_none());
    }

    #[test]
    fn failures_clear_loading() {
        let (mut app, _rx) = app("http://localhost:8080/");
        app.loading = true;
        app.apply_event(AppEvent::LookupFailed(EntryError::NotFound));
        assert!(!app.loading);
        assert_eq!(app.banner.as_ref().unwrap().text, "School not found");

        app.loading = true;
        app.apply_event(AppEvent::SubmitFailed(EntryError::Contention));
        assert!(!app.loading);
    }

    #[test]
    fn focus_wraps_around() {
        let (mut app, _rx) = app("http://localhost:8080/");
        app.apply_event(AppEvent::SchoolLoaded(details("UPS", None)));
        app.focus = FocusField::Udise;
        app.handle_key_event(KeyCode::BackTab);
        assert_eq!(app.focus, FocusField::Class(8, ClassField::Appeared));
        app.handle_key_event(KeyCode::Tab);
        assert_eq!(app.focus, FocusField::Udise);
    }
}
