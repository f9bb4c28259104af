use crate::school::SubmitPayload;

/// UI 线程发给后台任务的命令
#[derive(Debug, Clone)]
pub enum AppCommand {
    Lookup { udise: String },
    Submit { payload: SubmitPayload },
    Quit,
}
