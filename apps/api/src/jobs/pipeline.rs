//! Company pipeline board: candidate applications grouped into the hiring
//! stages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    pub id: &'static str,
    pub titulo: &'static str,
}

pub const BOARD_COLUMNS: [BoardColumn; 5] = [
    BoardColumn { id: "novos", titulo: "Novos Candidatos" },
    BoardColumn { id: "entrevista-rh", titulo: "Entrevista RH" },
    BoardColumn { id: "entrevista-tecnica", titulo: "Entrevista Técnica" },
    BoardColumn { id: "proposta", titulo: "Proposta" },
    BoardColumn { id: "contratado", titulo: "Contratado" },
];

pub fn is_board_status(status: &str) -> bool {
    BOARD_COLUMNS.iter().any(|c| c.id == status)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyApplication {
    pub id: String,
    pub status: String,
    #[serde(default, alias = "nome")]
    pub candidato: String,
    #[serde(default, alias = "cargo")]
    pub vaga: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCards {
    #[serde(flatten)]
    pub column: BoardColumn,
    pub candidaturas: Vec<CompanyApplication>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineBoard {
    pub columns: Vec<ColumnCards>,
    /// Applications whose status matches no column.
    pub unassigned: Vec<CompanyApplication>,
}

impl PipelineBoard {
    pub fn column(&self, id: &str) -> Option<&ColumnCards> {
        self.columns.iter().find(|c| c.column.id == id)
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.candidaturas.len()).sum::<usize>() + self.unassigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn group_into_board(applications: Vec<CompanyApplication>) -> PipelineBoard {
    let mut columns: Vec<ColumnCards> = BOARD_COLUMNS
        .iter()
        .map(|&column| ColumnCards { column, candidaturas: Vec::new() })
        .collect();
    let mut unassigned = Vec::new();

    for application in applications {
        match columns.iter_mut().find(|c| c.column.id == application.status) {
            Some(cards) => cards.candidaturas.push(application),
            None => unassigned.push(application),
        }
    }

    PipelineBoard { columns, unassigned }
}

/// Moves a card to `target`, updating its status. Returns false (and leaves
/// the board untouched) when the id or the target column is unknown.
pub fn move_application(board: &mut PipelineBoard, id: &str, target: &str) -> bool {
    let Some(target_idx) = board.columns.iter().position(|c| c.column.id == target) else {
        return false;
    };

    let mut found = None;
    for cards in board.columns.iter_mut() {
        if let Some(pos) = cards.candidaturas.iter().position(|a| a.id == id) {
            found = Some(cards.candidaturas.remove(pos));
            break;
        }
    }
    if found.is_none() {
        if let Some(pos) = board.unassigned.iter().position(|a| a.id == id) {
            found = Some(board.unassigned.remove(pos));
        }
    }

    match found {
        Some(mut application) => {
            application.status = target.to_string();
            board.columns[target_idx].candidaturas.push(application);
            true
        }
        None => false,
    }
}
