use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOpening {
    pub id: &'static str,
    pub title: &'static str,
    pub company: &'static str,
    pub location: &'static str,
    pub work_type: &'static str,
    pub description: &'static str,
}

/// Public openings shown on the landing page. Applying to one sends the
/// candidate to the onboarding wizard with `?vaga={id}`.
pub static FEATURED_OPENINGS: [JobOpening; 4] = [
    JobOpening {
        id: "product-manager",
        title: "Product Manager Senior",
        company: "NEXJOB",
        location: "Remoto - Brasil",
        work_type: "Tempo integral",
        description: "Lidere squads multidisciplinares na construção de experiências digitais centradas no usuário e impulsione o roadmap de produtos estratégicos.",
    },
    JobOpening {
        id: "ux-designer",
        title: "UX/UI Designer Pleno",
        company: "NEXJOB",
        location: "São Paulo/SP (Híbrido)",
        work_type: "Tempo integral",
        description: "Desenvolva protótipos e pesquisas com usuários para criar jornadas encantadoras em produtos que impactam milhares de pessoas.",
    },
    JobOpening {
        id: "software-engineer",
        title: "Software Engineer Front-end",
        company: "NEXJOB",
        location: "Remoto - Brasil",
        work_type: "Tempo integral",
        description: "Construa interfaces performáticas com React e Next.js, colaborando em um ambiente ágil e orientado a resultados.",
    },
    JobOpening {
        id: "data-analyst",
        title: "Data Analyst",
        company: "NEXJOB",
        location: "Belo Horizonte/MG (Híbrido)",
        work_type: "Tempo integral",
        description: "Monitore indicadores de negócio, estruture dashboards e apoie times na tomada de decisões baseada em dados.",
    },
];

pub fn find_opening(id: &str) -> Option<&'static JobOpening> {
    FEATURED_OPENINGS.iter().find(|o| o.id == id)
}
